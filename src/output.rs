//! Writers for the rewritten proxy list, the error log and JSON artifacts

use crate::error::RunError;
use crate::proxy::models::AliveProxy;
use crate::proxy::parser::CandidateParser;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};
use tracing::debug;

/// Render one alive proxy as `ip,port,countryCode,providerName`
///
/// Line breaks inside the metadata become spaces; the list is read back
/// one line per record.
pub fn format_alive_line(proxy: &AliveProxy) -> String {
    let flatten = |field: Option<&str>| field.unwrap_or_default().replace(['\r', '\n'], " ");

    CandidateParser::format_line(&[
        proxy.ip.clone(),
        proxy.port.clone(),
        flatten(proxy.country_code.as_deref()),
        flatten(proxy.provider_name.as_deref()),
    ])
}

/// The rewritten list, written to a temporary file beside its destination
///
/// Nothing touches the destination until [`StagedList::commit`].
pub struct StagedList {
    file: NamedTempFile,
}

impl StagedList {
    /// Write `proxies` to a temporary file in the same directory as `dest`
    pub fn stage<P: AsRef<Path>>(dest: P, proxies: &[AliveProxy]) -> Result<Self, RunError> {
        let dest = dest.as_ref();
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut builder = Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Same mode a plain create would get under the process umask
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let mut file = builder
            .tempfile_in(dir)
            .map_err(|e| RunError::output_write(dir, e))?;
        for proxy in proxies {
            writeln!(file, "{}", format_alive_line(proxy))
                .map_err(|e| RunError::output_write(file.path(), e))?;
        }
        file.flush()
            .map_err(|e| RunError::output_write(file.path(), e))?;

        // The rewrite keeps the mode of the list it replaces
        if let Ok(metadata) = fs::metadata(dest) {
            file.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| RunError::output_write(file.path(), e))?;
        }

        debug!(path = %file.path().display(), count = proxies.len(), "staged alive list");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Move the staged file over `dest`
    pub fn commit<P: AsRef<Path>>(self, dest: P) -> Result<(), RunError> {
        let dest = dest.as_ref();
        self.file
            .persist(dest)
            .map_err(|e| RunError::output_write(dest, e.error))?;
        Ok(())
    }
}

/// Overwrite `path` with one message per line
pub fn write_error_log<P: AsRef<Path>, S: AsRef<str>>(
    path: P,
    messages: &[S],
) -> Result<(), RunError> {
    let path = path.as_ref();
    let mut content = String::new();
    for message in messages {
        content.push_str(message.as_ref());
        content.push('\n');
    }

    fs::write(path, content).map_err(|e| RunError::output_write(path, e))
}

/// Serialize `value` as two-space indented JSON into `path`
pub fn write_json<P: AsRef<Path>, T: Serialize + ?Sized>(path: P, value: &T) -> Result<(), RunError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(value).map_err(|source| RunError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, json).map_err(|e| RunError::output_write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::models::Candidate;
    use std::collections::BTreeMap;

    fn alive(ip: &str, cc: Option<&str>, isp: Option<&str>) -> AliveProxy {
        AliveProxy::new(
            &Candidate::new(ip, "443"),
            cc.map(String::from),
            isp.map(String::from),
        )
    }

    #[test]
    fn test_format_alive_line() {
        let proxy = alive("1.1.1.1", Some("US"), Some("Cloudflare, Inc."));
        assert_eq!(format_alive_line(&proxy), "1.1.1.1,443,US,\"Cloudflare, Inc.\"");

        let proxy = alive("1.1.1.1", None, None);
        assert_eq!(format_alive_line(&proxy), "1.1.1.1,443,,");
    }

    #[test]
    fn test_stage_does_not_touch_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("listproxy");
        fs::write(&dest, "original\n").unwrap();

        let staged = StagedList::stage(&dest, &[alive("1.1.1.1", Some("US"), Some("A"))]).unwrap();
        assert_eq!(staged.path().parent(), Some(dir.path()));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "original\n");
        assert_eq!(
            fs::read_to_string(staged.path()).unwrap(),
            "1.1.1.1,443,US,A\n"
        );
    }

    #[test]
    fn test_commit_replaces_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("listproxy");
        fs::write(&dest, "1.1.1.1,443\n9.9.9.9,80\n").unwrap();

        let proxies = vec![
            alive("1.1.1.1", Some("US"), Some("A")),
            alive("2.2.2.2", Some("JP"), None),
        ];
        StagedList::stage(&dest, &proxies).unwrap().commit(&dest).unwrap();

        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "1.1.1.1,443,US,A\n2.2.2.2,443,JP,\n"
        );
        // Only the destination remains in the directory
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_commit_keeps_destination_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("listproxy");
        for mode in [0o644, 0o640] {
            fs::write(&dest, "1.1.1.1,443\n").unwrap();
            fs::set_permissions(&dest, fs::Permissions::from_mode(mode)).unwrap();

            StagedList::stage(&dest, &[]).unwrap().commit(&dest).unwrap();

            let after = fs::metadata(&dest).unwrap().permissions().mode() & 0o777;
            assert_eq!(after, mode);
        }
    }

    #[test]
    fn test_format_alive_line_flattens_line_breaks() {
        let proxy = alive("1.1.1.1", Some("US"), Some("Example\r\nNetworks, Inc."));
        let line = format_alive_line(&proxy);
        assert_eq!(line, "1.1.1.1,443,US,\"Example  Networks, Inc.\"");

        let candidates = CandidateParser::parse_string(&format!("{}\n", line));
        assert_eq!(candidates, vec![Candidate::new("1.1.1.1", "443")]);
    }

    #[test]
    fn test_stage_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("listproxy");
        StagedList::stage(&dest, &[]).unwrap().commit(&dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "");
    }

    #[test]
    fn test_stage_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing").join("listproxy");
        let err = StagedList::stage(&dest, &[]).err().unwrap();
        assert!(matches!(err, RunError::OutputWrite { .. }));
    }

    #[test]
    fn test_write_error_log_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("error.txt");
        fs::write(&path, "stale\nstale\nstale\n").unwrap();

        write_error_log(&path, &["1.1.1.1:443 is DEAD", "Error checking 2.2.2.2:80: boom"]).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "1.1.1.1:443 is DEAD\nError checking 2.2.2.2:80: boom\n"
        );
    }

    #[test]
    fn test_write_json_indented() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut value = BTreeMap::new();
        value.insert("US", vec!["1.1.1.1:443"]);

        write_json(&path, &value).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\n  \"US\": [\n    \"1.1.1.1:443\"\n  ]\n}"
        );
    }

    #[test]
    fn test_write_json_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        let err = write_json(&path, &BTreeMap::<String, String>::new()).unwrap_err();
        assert!(matches!(err, RunError::OutputWrite { .. }));
    }
}
