//! Generate command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::compositor::TileCompositor;
use crate::config::loader::{find_config, load_config, merge_cli_overrides, resolve_path, CliOverrides};
use crate::config::SignConfig;
use crate::generate::{generate, GenerateOptions, SignStatus};
use crate::loader::{load_file, LoadResult};

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Load the config and anchor its paths at the config file's directory.
///
/// CLI overrides are applied afterwards and stay relative to the working
/// directory.
pub(super) fn load_settings(
    config_path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<SignConfig, String> {
    let config_path = config_path.map(Path::to_path_buf).or_else(find_config);

    let mut config = match &config_path {
        Some(path) => {
            log::info!("using config {}", path.display());
            let mut config = load_config(Some(path)).map_err(|e| e.to_string())?;
            if let Some(root) = path.parent() {
                config.project.input = resolve_path(root, &config.project.input);
                config.project.assets = resolve_path(root, &config.project.assets);
                config.project.out = resolve_path(root, &config.project.out);
            }
            config
        }
        None => {
            log::info!("no linesign.toml found, using defaults");
            SignConfig::default()
        }
    };

    merge_cli_overrides(&mut config, overrides);

    let errors = config.validate();
    if !errors.is_empty() {
        let lines: Vec<String> = errors.iter().map(|e| format!("  - {}", e)).collect();
        return Err(format!("Invalid settings:\n{}", lines.join("\n")));
    }
    Ok(config)
}

/// Load the line description, printing loader warnings.
pub(super) fn load_input(path: &Path) -> Result<LoadResult, String> {
    let loaded = load_file(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    for warning in &loaded.warnings {
        eprintln!("Warning: {}: {}", path.display(), warning);
    }
    Ok(loaded)
}

/// Run the generate command
pub fn run_generate(config: Option<&Path>, overrides: CliOverrides, dry_run: bool) -> ExitCode {
    let settings = match load_settings(config, &overrides) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let loaded = match load_input(&settings.project.input) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if loaded.segments.is_empty() {
        eprintln!("Error: no line segments in {}", settings.project.input.display());
        return ExitCode::from(EXIT_ERROR);
    }

    println!(
        "Generating signs for {} segment{} from {}",
        loaded.segments.len(),
        if loaded.segments.len() == 1 { "" } else { "s" },
        settings.project.input.display()
    );

    let compositor = TileCompositor::new(&settings.project.assets, settings.layout.cell_size);
    let options = GenerateOptions {
        policy: settings.layout,
        out_dir: settings.project.out.clone(),
        jobs: settings.render.jobs,
        dry_run,
    };

    let result = generate(&loaded.segments, &options, &compositor);

    if dry_run {
        println!("Dry run - would write to {}:", settings.project.out.display());
        for sign in result.signs.iter().filter(|s| s.status == SignStatus::Planned) {
            println!("  - {}.png", sign.name);
        }
    }

    if result.is_success() {
        println!("{}", result.summary());
        ExitCode::from(EXIT_SUCCESS)
    } else {
        eprintln!("{}", result.summary());
        ExitCode::from(EXIT_ERROR)
    }
}
