use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Environment variable that overrides the configured filter
pub const LOG_ENV: &str = "GLITCHTYPE_LOG";

/// Send log output to `path`. The terminal belongs to the UI, so nothing is
/// ever written to stdout/stderr.
pub fn init(filter: &str, path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    Builder::new()
        .parse_filters(filter)
        .parse_env(Env::new().filter(LOG_ENV))
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
        .map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("glitchtype.log");
        // only one logger per process; a second init in the same test binary errors
        if init("debug", &path).is_ok() {
            log::info!("hello from the test");
            log::logger().flush();
            let contents = fs::read_to_string(&path).unwrap();
            assert!(contents.contains("hello from the test"));
        }
        assert!(path.exists());
    }
}
