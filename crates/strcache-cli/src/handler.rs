//! Command handler: applies script commands to a shared cache

use std::io::{self, Write};

use strcache::{Insertion, SharedCache};
use tracing::debug;

use crate::script::Command;

pub struct CommandHandler {
    cache: SharedCache<String>,
}

impl CommandHandler {
    pub fn new(cache: SharedCache<String>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &SharedCache<String> {
        &self.cache
    }

    /// Execute one command, writing its reply line(s) to `out`
    pub fn handle<W: Write>(&self, cmd: Command, out: &mut W) -> io::Result<()> {
        match cmd {
            Command::Insert { key, value } => self.handle_insert(&key, value, out),
            Command::Update { key, value } => self.handle_update(&key, value, out),
            Command::Find(key) => self.handle_find(&key, out),
            Command::Peek(key) => self.handle_peek(&key, out),
            Command::Remove(key) => self.handle_remove(&key, out),
            Command::Print => self.handle_print(out),
            Command::Len => writeln!(out, "{}/{}", self.cache.len(), self.cache.capacity()),
            Command::Stats => self.handle_stats(out),
            Command::Clear => {
                self.cache.clear();
                writeln!(out, "OK")
            }
        }
    }

    fn handle_insert<W: Write>(&self, key: &str, value: String, out: &mut W) -> io::Result<()> {
        match self.cache.insert(key, value) {
            Ok(Insertion::Inserted) => writeln!(out, "inserted"),
            Ok(Insertion::Evicted { key: victim, .. }) => {
                debug!(key, victim = %victim, "insert evicted an entry");
                writeln!(out, "inserted (evicted {})", victim)
            }
            Ok(Insertion::Refreshed(_)) => writeln!(out, "refreshed"),
            Err(e) => writeln!(out, "ERR {}", e),
        }
    }

    fn handle_update<W: Write>(&self, key: &str, value: String, out: &mut W) -> io::Result<()> {
        match self.cache.update(key, value) {
            Ok(Some(old)) => writeln!(out, "updated (was {})", old),
            Ok(None) => writeln!(out, "(nil)"),
            Err(e) => writeln!(out, "ERR {}", e),
        }
    }

    fn handle_find<W: Write>(&self, key: &str, out: &mut W) -> io::Result<()> {
        match self.cache.find(key) {
            Some(value) => writeln!(out, "{}", value),
            None => writeln!(out, "(nil)"),
        }
    }

    fn handle_peek<W: Write>(&self, key: &str, out: &mut W) -> io::Result<()> {
        match self.cache.peek(key) {
            Some(value) => writeln!(out, "{}", value),
            None => writeln!(out, "(nil)"),
        }
    }

    fn handle_remove<W: Write>(&self, key: &str, out: &mut W) -> io::Result<()> {
        match self.cache.remove(key) {
            Some(value) => writeln!(out, "removed (was {})", value),
            None => writeln!(out, "(nil)"),
        }
    }

    fn handle_print<W: Write>(&self, out: &mut W) -> io::Result<()> {
        // One locked pass decides both the listing and the empty marker
        let mut printed = 0;
        self.cache.print(out, |w, key, value| {
            printed += 1;
            writeln!(w, "{} = {}", key, value)
        })?;
        if printed == 0 {
            writeln!(out, "(empty)")?;
        }
        Ok(())
    }

    fn handle_stats<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let stats = self.cache.stats();
        writeln!(
            out,
            "hits={} misses={} inserts={} refreshes={} evictions={} hit_ratio={:.2}",
            stats.hits(),
            stats.misses(),
            stats.inserts(),
            stats.refreshes(),
            stats.evictions(),
            stats.hit_ratio()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler(capacity: usize) -> CommandHandler {
        CommandHandler::new(SharedCache::new(capacity).unwrap())
    }

    fn run(handler: &CommandHandler, cmd: Command) -> String {
        let mut out = Vec::new();
        handler.handle(cmd, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn insert(key: &str, value: &str) -> Command {
        Command::Insert {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_handle_insert_and_find() {
        let h = handler(2);

        assert_eq!(run(&h, insert("a", "1")), "inserted\n");
        assert_eq!(run(&h, insert("a", "2")), "refreshed\n");
        assert_eq!(run(&h, Command::Find("a".to_string())), "1\n");
        assert_eq!(run(&h, Command::Find("b".to_string())), "(nil)\n");
    }

    #[test]
    fn test_handle_eviction_reply() {
        let h = handler(2);
        run(&h, insert("a", "1"));
        run(&h, insert("b", "2"));
        run(&h, Command::Find("a".to_string()));

        assert_eq!(run(&h, insert("c", "3")), "inserted (evicted b)\n");
        assert_eq!(run(&h, Command::Print), "c = 3\na = 1\n");
        assert_eq!(run(&h, Command::Len), "2/2\n");
    }

    #[test]
    fn test_handle_update_remove_peek() {
        let h = handler(3);
        run(&h, insert("a", "1"));

        assert_eq!(
            run(
                &h,
                Command::Update {
                    key: "a".to_string(),
                    value: "9".to_string()
                }
            ),
            "updated (was 1)\n"
        );
        assert_eq!(run(&h, Command::Peek("a".to_string())), "9\n");
        assert_eq!(run(&h, Command::Remove("a".to_string())), "removed (was 9)\n");
        assert_eq!(run(&h, Command::Remove("a".to_string())), "(nil)\n");
        assert_eq!(run(&h, Command::Print), "(empty)\n");
    }

    #[test]
    fn test_handle_print_after_clear() {
        let h = handler(2);
        run(&h, insert("a", "1"));
        assert_eq!(run(&h, Command::Print), "a = 1\n");

        h.cache().clear();
        assert_eq!(run(&h, Command::Print), "(empty)\n");

        run(&h, insert("b", "2"));
        assert_eq!(run(&h, Command::Print), "b = 2\n");
    }

    #[test]
    fn test_handle_stats_and_clear() {
        let h = handler(2);
        run(&h, insert("a", "1"));
        run(&h, Command::Find("a".to_string()));
        run(&h, Command::Find("x".to_string()));

        assert_eq!(
            run(&h, Command::Stats),
            "hits=1 misses=1 inserts=1 refreshes=0 evictions=0 hit_ratio=0.50\n"
        );
        assert_eq!(run(&h, Command::Clear), "OK\n");
        assert_eq!(run(&h, Command::Len), "0/2\n");
        assert!(h.cache().is_empty());
    }
}
