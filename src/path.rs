//! Current-working-directory path edits.
//!
//! The shell keeps a single absolute, `/`-separated working directory in a
//! fixed-capacity [`PathBuf`]. [`resolve`] applies a `cd`-style argument to
//! it and produces a *candidate* path; committing the candidate is the
//! caller's job, after verifying it against the filesystem.
//!
//! Relative paths are a single directory name only; `../like/this` is not
//! understood.

/// Capacity of the working-directory and scratch path buffers, in path bytes.
pub const PATH_BUF_SIZE: usize = 80;

/// Fixed-capacity absolute path.
pub type PathBuf = heapless::String<PATH_BUF_SIZE>;

/// The requested edit would not fit in a [`PathBuf`].
///
/// This is a purely local error class, raised before any filesystem call is
/// attempted. It never surfaces as a filesystem result code.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PathTooLong;

/// The root path.
pub fn root() -> PathBuf {
    let mut p = PathBuf::new();
    // "/" always fits
    p.push('/').ok();
    p
}

/// Apply a `cd`-style argument to the current directory, producing a
/// candidate path.
///
/// Rules, evaluated in order:
///
/// * an argument beginning with `/` is already absolute and is used verbatim;
/// * `..` strips the last path segment, never the leading root slash, and is
///   a no-op at root;
/// * anything else names a directory inside `cwd` and is appended, with a
///   separator unless `cwd` is the root.
///
/// `cwd` must be a valid absolute path; the result then is one too.
pub fn resolve(cwd: &str, arg: &str) -> Result<PathBuf, PathTooLong> {
    if arg.starts_with('/') {
        let mut out = PathBuf::new();
        out.push_str(arg).map_err(|_| PathTooLong)?;
        Ok(out)
    } else if arg == ".." {
        // Scan back for the previous separator, stopping short of the root
        // slash at index 0.
        let end = match cwd[1..].rfind('/') {
            Some(idx) => idx + 1,
            None => 1,
        };
        let mut out = PathBuf::new();
        out.push_str(&cwd[..end]).map_err(|_| PathTooLong)?;
        Ok(out)
    } else {
        join(cwd, arg)
    }
}

/// Fully qualify `name` under `cwd`: append a separator unless `cwd` is the
/// root, then append `name`. Rejects results that would not fit.
pub fn join(cwd: &str, name: &str) -> Result<PathBuf, PathTooLong> {
    let mut out = PathBuf::new();
    out.push_str(cwd).map_err(|_| PathTooLong)?;
    if cwd != "/" {
        out.push('/').map_err(|_| PathTooLong)?;
    }
    out.push_str(name).map_err(|_| PathTooLong)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_argument_used_verbatim() {
        assert_eq!(resolve("/some/where", "/logs").unwrap().as_str(), "/logs");
        assert_eq!(resolve("/", "/a/b/c").unwrap().as_str(), "/a/b/c");
    }

    #[test]
    fn dotdot_strips_last_segment() {
        assert_eq!(resolve("/a/b", "..").unwrap().as_str(), "/a");
        assert_eq!(resolve("/a", "..").unwrap().as_str(), "/");
    }

    #[test]
    fn dotdot_at_root_is_noop() {
        assert_eq!(resolve("/", "..").unwrap().as_str(), "/");
    }

    #[test]
    fn relative_appends_with_separator() {
        assert_eq!(resolve("/a", "b").unwrap().as_str(), "/a/b");
    }

    #[test]
    fn relative_at_root_adds_no_double_slash() {
        assert_eq!(resolve("/", "a").unwrap().as_str(), "/a");
    }

    #[test]
    fn overlong_absolute_rejected() {
        let long = core::str::from_utf8(&[b'x'; PATH_BUF_SIZE + 8]).unwrap();
        let mut abs = heapless::String::<{ PATH_BUF_SIZE + 9 }>::new();
        abs.push('/').unwrap();
        abs.push_str(long).unwrap();
        assert_eq!(resolve("/", &abs), Err(PathTooLong));
    }

    #[test]
    fn overlong_append_rejected() {
        // cwd + '/' + arg would exceed the buffer by one byte
        let cwd = core::str::from_utf8(&[b'c'; PATH_BUF_SIZE / 2]).unwrap();
        let arg = core::str::from_utf8(&[b'a'; PATH_BUF_SIZE / 2]).unwrap();
        let mut cwd_abs = PathBuf::new();
        cwd_abs.push('/').unwrap();
        cwd_abs.push_str(&cwd[..PATH_BUF_SIZE / 2 - 1]).unwrap();
        assert_eq!(resolve(&cwd_abs, arg), Err(PathTooLong));
    }

    #[test]
    fn append_exactly_at_capacity_accepted() {
        // '/' + 39 bytes + '/' + 39 bytes == 80 bytes
        let seg = core::str::from_utf8(&[b's'; PATH_BUF_SIZE / 2 - 1]).unwrap();
        let mut cwd = PathBuf::new();
        cwd.push('/').unwrap();
        cwd.push_str(seg).unwrap();
        let got = resolve(&cwd, seg).unwrap();
        assert_eq!(got.len(), PATH_BUF_SIZE);
    }

    #[test]
    fn join_qualifies_file_names() {
        assert_eq!(join("/", "README.TXT").unwrap().as_str(), "/README.TXT");
        assert_eq!(join("/docs", "README.TXT").unwrap().as_str(), "/docs/README.TXT");
    }
}
