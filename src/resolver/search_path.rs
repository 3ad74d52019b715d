//! Filesystem resolver over a configured list of directories.

use super::SourceResolver;
use crate::parser::ModuleName;
use crate::utils::config::StudioConfig;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::thread;

/// Looks module files up in each search path in order
#[derive(Debug, Clone)]
pub struct SearchPathResolver {
    search_paths: Vec<PathBuf>,
    extensions: Vec<String>,
    threads: usize,
}

impl SearchPathResolver {
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        let defaults = StudioConfig::default();
        Self {
            search_paths,
            extensions: defaults.source_extensions,
            threads: defaults.resolver_threads,
        }
    }

    pub fn from_config(config: &StudioConfig) -> Self {
        Self {
            search_paths: config.search_paths.clone(),
            extensions: config.source_extensions.clone(),
            threads: config.resolver_threads.max(1),
        }
    }

    /// Candidate relative paths for a module file name.
    ///
    /// Class names come as dotted package paths (`pkg.Class`), which map to
    /// `pkg/Class.cls`.
    fn candidates(&self, file: &str) -> Vec<PathBuf> {
        let mut out = vec![PathBuf::from(file)];
        let has_known_ext = self.extensions.iter().any(|ext| file.ends_with(ext.as_str()));
        if !has_known_ext {
            let as_path = file.replace('.', "/");
            for ext in &self.extensions {
                out.push(PathBuf::from(format!("{}{}", file, ext)));
                out.push(PathBuf::from(format!("{}{}", as_path, ext)));
            }
        }
        out
    }

    fn exists_in_search_paths(&self, relative: &Path) -> bool {
        if relative.as_os_str().is_empty() {
            return false;
        }
        if relative.is_absolute() {
            return relative.is_file();
        }
        self.search_paths
            .iter()
            .any(|dir| dir.join(relative).is_file())
    }
}

impl SourceResolver for SearchPathResolver {
    fn has_source(&self, name: &ModuleName<'_>) -> bool {
        if name.file.is_empty() {
            return false;
        }
        self.candidates(name.file)
            .iter()
            .any(|candidate| self.exists_in_search_paths(candidate))
    }

    fn has_listing(&self, listing_file: &str) -> bool {
        !listing_file.is_empty() && self.exists_in_search_paths(Path::new(listing_file))
    }

    /// Splits the batch across scoped worker threads
    fn resolve_batch(&self, display_names: &[&str]) -> Vec<bool> {
        if self.search_paths.is_empty() {
            return vec![false; display_names.len()];
        }

        debug!(
            "Resolving {} module sources on {} threads",
            display_names.len(),
            self.threads
        );

        resolve_in_chunks(display_names, self.threads, |name| {
            self.has_source(&ModuleName::parse(name))
        })
    }
}

/// Run `lookup` over `names` on up to `threads` scoped workers
///
/// A chunk whose worker panicked answers `false` for each of its names, so
/// the output always lines up with the input.
fn resolve_in_chunks<F>(names: &[&str], threads: usize, lookup: F) -> Vec<bool>
where
    F: Fn(&str) -> bool + Sync,
{
    let chunk_size = names.len().div_ceil(threads.max(1)).max(1);
    let lookup = &lookup;

    thread::scope(|scope| {
        let handles: Vec<_> = names
            .chunks(chunk_size)
            .map(|chunk| {
                let handle = scope.spawn(move || {
                    chunk.iter().map(|&name| lookup(name)).collect::<Vec<bool>>()
                });
                (chunk.len(), handle)
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|(len, handle)| {
                handle.join().unwrap_or_else(|_| {
                    warn!("Source lookup worker panicked; {} modules left unlinked", len);
                    vec![false; len]
                })
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_resolves_files_in_search_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("orders.p"), "").unwrap();
        fs::create_dir_all(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("pkg/Widget.cls"), "").unwrap();

        let resolver = SearchPathResolver::new(vec![dir.path().to_path_buf()]);
        assert!(resolver.has_source(&ModuleName::parse("calc orders.p")));
        assert!(resolver.has_source(&ModuleName::parse("Ctor pkg.Widget")));
        assert!(!resolver.has_source(&ModuleName::parse("missing.p")));
    }

    #[test]
    fn test_batch_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.p"), "").unwrap();
        fs::write(dir.path().join("c.p"), "").unwrap();

        let mut config = StudioConfig::default();
        config.search_paths = vec![dir.path().to_path_buf()];
        config.resolver_threads = 2;
        let resolver = SearchPathResolver::from_config(&config);

        let names = ["a.p", "b.p", "run c.p", "", "d.p"];
        assert_eq!(
            resolver.resolve_batch(&names),
            vec![true, false, true, false, false]
        );
    }

    #[test]
    fn test_failed_chunk_stays_aligned() {
        let names = ["a.p", "boom.p", "c.p", "d.p"];
        let links = resolve_in_chunks(&names, 2, |name| {
            if name == "boom.p" {
                panic!("lookup failed");
            }
            true
        });

        // first chunk [a.p, boom.p] is lost, second chunk keeps its slots
        assert_eq!(links, vec![false, false, true, true]);
    }

    #[test]
    fn test_listing_lookup() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.lst"), "").unwrap();

        let resolver = SearchPathResolver::new(vec![dir.path().to_path_buf()]);
        assert!(resolver.has_listing("main.lst"));
        assert!(!resolver.has_listing(""));
    }
}
