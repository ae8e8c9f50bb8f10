// Path normalization utilities
// Lexical cleaning and absolute resolution of the traversal root and link targets

use std::io;
use std::path::{Component, Path, PathBuf};

/// Resolve a path that may be relative or absolute
/// If relative, resolves against the provided base directory
pub fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Clean a path by removing redundant components like "." and ".."
/// Purely lexical: the path does not need to exist and symlinks are not resolved
pub fn clean_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => continue,
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                // ".." at the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            _ => components.push(component),
        }
    }

    let result: PathBuf = components.iter().collect();

    if result.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        result
    }
}

/// Absolute, cleaned form of `path`, resolved against the current directory
pub fn absolute_clean(path: &Path) -> io::Result<PathBuf> {
    let cleaned = clean_path(path);
    if cleaned.is_absolute() {
        return Ok(cleaned);
    }
    let cwd = std::env::current_dir()?;
    Ok(clean_path(&cwd.join(cleaned)))
}
