//! Promokit CLI
//!
//! Commands: platforms, templates, layout, options, validate, render, preview
//! Outputs JSON to stdout
//! Returns 2 on validation failure or a failed export, 1 on other errors

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use promokit_core::{
    layout, platforms, templates, typography, ExportFormat, ExportPipeline, LocalImageSource,
    RenderJob, RootColor, Studio, StudioError, TemplateKey,
};

#[derive(Parser)]
#[command(name = "promokit-cli")]
#[command(about = "Promokit CLI - on-brand promo graphics")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Png,
    Svg,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => ExportFormat::Png,
            FormatArg::Svg => ExportFormat::Svg,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List platforms with their sizes and type scales
    Platforms,

    /// List templates with their default colors
    Templates,

    /// Show the layout plan for a template on a platform
    Layout {
        #[arg(short, long)]
        template: String,

        #[arg(short, long)]
        platform: String,
    },

    /// Colors offerable for a template's dependent slots
    Options {
        #[arg(short, long)]
        template: String,

        /// Background to check against (defaults to the template's)
        #[arg(short, long)]
        background: Option<String>,
    },

    /// Check a job file's engine version and color assignments
    Validate {
        #[arg(short, long)]
        job: PathBuf,
    },

    /// Render a job file and write the export
    Render {
        #[arg(short, long)]
        job: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Overrides the job's format
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Directory relative image paths are read from
        #[arg(long)]
        assets: Option<PathBuf>,
    },

    /// Write a scaled preview SVG for a job file
    Preview {
        #[arg(short, long)]
        job: PathBuf,

        #[arg(long, default_value_t = 540.0)]
        width: f64,

        #[arg(long, default_value_t = 540.0)]
        height: f64,

        #[arg(short, long)]
        out: PathBuf,
    },
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!(r#"{{"error": "Failed to serialise output: {}"}}"#, e),
    }
}

fn failure(error: impl std::fmt::Display) -> ExitCode {
    print_json(&json!({ "success": false, "error": error.to_string() }));
    ExitCode::FAILURE
}

fn exit_for(error: &StudioError) -> ExitCode {
    match error {
        StudioError::ValidationFailed(_) => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Platforms => {
            let mut rows = vec![];
            for spec in platforms::all() {
                match typography::resolve(spec.key) {
                    Ok(scale) => rows.push(json!({
                        "key": spec.key,
                        "label": spec.label,
                        "width": spec.width,
                        "height": spec.height,
                        "typeScale": scale,
                    })),
                    Err(e) => return failure(e),
                }
            }
            print_json(&rows);
            ExitCode::SUCCESS
        }

        Commands::Templates => {
            let rows: Vec<_> = templates::all()
                .iter()
                .map(|t| {
                    let slots: serde_json::Map<String, serde_json::Value> = t
                        .default_slots
                        .iter()
                        .map(|(slot, c)| (slot.to_string(), json!(c)))
                        .collect();
                    json!({
                        "key": t.key,
                        "label": t.label,
                        "background": t.default_background,
                        "slots": slots,
                    })
                })
                .collect();
            print_json(&rows);
            ExitCode::SUCCESS
        }

        Commands::Layout { template, platform } => match layout::select_keys(&template, &platform) {
            Ok(plan) => {
                print_json(&plan);
                ExitCode::SUCCESS
            }
            Err(e) => failure(e),
        },

        Commands::Options { template, background } => {
            let key: TemplateKey = match template.parse() {
                Ok(k) => k,
                Err(e) => return failure(e),
            };
            let mut studio = Studio::new();
            if let Err(e) = studio.select_template(key) {
                return failure(e);
            }
            if let Some(bg) = background {
                let color: RootColor = match bg.parse() {
                    Ok(c) => c,
                    Err(e) => return failure(e),
                };
                if let Err(e) = studio.set_background(color) {
                    return failure(e);
                }
            }
            match studio.available_options() {
                Ok(options) => {
                    print_json(&json!({ "template": key, "options": options }));
                    ExitCode::SUCCESS
                }
                Err(e) => failure(e),
            }
        }

        Commands::Validate { job } => {
            let job = match RenderJob::load(&job) {
                Ok(j) => j,
                Err(e) => return failure(e),
            };
            match Studio::new().validate_job(&job) {
                Ok(result) => {
                    print_json(&result);
                    if result.valid {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::from(2)
                    }
                }
                Err(e) => failure(e),
            }
        }

        Commands::Render {
            job,
            out,
            format,
            assets,
        } => {
            let job = match RenderJob::load(&job) {
                Ok(j) => j,
                Err(e) => return failure(e),
            };
            let mut studio = Studio::new();
            let report = match studio.apply_job(&job) {
                Ok(r) => r,
                Err(e) => {
                    let code = exit_for(&e);
                    failure(e);
                    return code;
                }
            };
            let source = match assets {
                Some(dir) => LocalImageSource::with_root(dir),
                None => LocalImageSource::new(),
            };
            let pipeline = ExportPipeline::new(source);
            let format = format.map(ExportFormat::from).unwrap_or(job.format);
            match studio.try_export(&pipeline, Some(&report.file_name), format) {
                Ok(Ok(file)) => match file.save_to(&out) {
                    Ok(path) => {
                        print_json(&json!({
                            "success": true,
                            "report": report,
                            "export": file,
                            "path": path,
                        }));
                        ExitCode::SUCCESS
                    }
                    Err(e) => failure(e),
                },
                Ok(Err(notice)) => {
                    print_json(&json!({ "success": false, "report": report, "notice": notice }));
                    ExitCode::from(2)
                }
                Err(e) => failure(e),
            }
        }

        Commands::Preview {
            job,
            width,
            height,
            out,
        } => {
            let job = match RenderJob::load(&job) {
                Ok(j) => j,
                Err(e) => return failure(e),
            };
            let mut studio = Studio::new();
            if let Err(e) = studio.apply_job(&job) {
                let code = exit_for(&e);
                failure(e);
                return code;
            }
            let rendered = match studio.preview((width, height)) {
                Ok(p) => p,
                Err(e) => return failure(e),
            };
            if let Err(e) = fs::write(&out, &rendered.svg) {
                return failure(e);
            }
            let (display_w, display_h) = rendered.preview.display_size();
            print_json(&json!({
                "success": true,
                "scale": rendered.preview.scale(),
                "transform": rendered.preview.css_transform(),
                "displaySize": [display_w, display_h],
                "path": out,
            }));
            ExitCode::SUCCESS
        }
    }
}
