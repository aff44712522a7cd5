use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::process;

use crate::config::{Backend, SiteConfig};

/// Fixed site directories; the data and markup locations come from config.
const REQUIRED_DIRS: &[&str] = &["website", "website/static", "website/pages"];

/// Static assets the pages link to
const EXPECTED_STATIC: &[&str] = &["css/site.css"];

/// Run all boot checks. Call this before Rocket launches.
/// Creates missing directories, warns about missing files, and
/// aborts if the data directory cannot be used.
pub fn run(config: &SiteConfig) {
    info!("hikeguide boot check starting...");

    let (warnings, errors) = check(config);

    if errors > 0 {
        error!(
            "Boot check FAILED: {} error(s), {} warning(s). Aborting.",
            errors, warnings
        );
        process::exit(1);
    }

    if warnings > 0 {
        warn!(
            "Boot check passed with {} warning(s). Some pages may render empty.",
            warnings
        );
    } else {
        info!("Boot check passed. All systems go.");
    }
}

/// Returns `(warnings, errors)`.
pub fn check(config: &SiteConfig) -> (u32, u32) {
    let mut warnings = 0u32;
    let mut errors = 0u32;

    // ── 1. Directories ─────────────────────────────────
    let mut dirs: Vec<&str> = REQUIRED_DIRS.to_vec();
    dirs.push(&config.data_dir);
    dirs.push(&config.static_dir);
    for dir in dirs {
        let path = Path::new(dir);
        if !path.exists() {
            match fs::create_dir_all(path) {
                Ok(_) => info!("  Created directory: {}", dir),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", dir, e);
                    errors += 1;
                }
            }
        }
    }

    // ── 2. Blog markup ─────────────────────────────────
    if !Path::new(&config.blog_markup).exists() {
        warn!(
            "  Missing blog markup: {} (blog page will list no posts)",
            config.blog_markup
        );
        warnings += 1;
    }

    // ── 3. Static assets ───────────────────────────────
    for file in EXPECTED_STATIC {
        let path = Path::new(&config.static_dir).join(file);
        if !path.exists() {
            warn!("  Missing static asset: {} (pages will be unstyled)", path.display());
            warnings += 1;
        }
    }

    // ── 4. Data directory writable ─────────────────────
    let data_dir = Path::new(&config.data_dir);
    if data_dir.exists() {
        let test_file = data_dir.join(".write_test");
        match fs::write(&test_file, "test") {
            Ok(_) => {
                let _ = fs::remove_file(&test_file);
            }
            Err(e) => {
                error!("  Data directory not writable: {}", e);
                errors += 1;
            }
        }
    }

    // ── 5. SQLite file location ────────────────────────
    if config.backend == Backend::Sqlite {
        if let Some(parent) = Path::new(&config.db_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                match fs::create_dir_all(parent) {
                    Ok(_) => info!("  Created directory: {}", parent.display()),
                    Err(e) => {
                        error!("  FAILED to create directory {}: {}", parent.display(), e);
                        errors += 1;
                    }
                }
            }
        }
    }

    info!("  Post store backend: {:?}", config.backend);

    (warnings, errors)
}
