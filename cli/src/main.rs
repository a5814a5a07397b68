use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use inkmix::chart::{self, ChartEntry};
use inkmix::mixer::{self, MixResult, SolverConfig};
use inkmix::{picker, Cmyk, Palette, Rgb};
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "inkmix", about = "Convert colors and mix inks to match a target")]
pub struct Options {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the RGB and CMYK representation of a color
    Convert {
        /// Hex color (#rrggbb) or decimal r,g,b
        color: Rgb,
    },

    /// Pick the color of a pixel from an image
    Pick {
        #[arg(long, short)]
        input: PathBuf,

        #[arg(long, short)]
        x: u32,

        #[arg(long, short)]
        y: u32,

        /// Also print the grid of pixels around the picked one
        #[arg(long)]
        loupe: bool,
    },

    /// Find the ratios in which to mix inks to match target colors
    Mix {
        /// Color of an ink as hex or r,g,b, may be repeated
        #[arg(long = "ink")]
        inks: Vec<Rgb>,

        /// JSON file with a list of inks as hex strings or {c, m, y, k} objects
        #[arg(long, short)]
        palette: Option<PathBuf>,

        /// Color to approximate as hex or r,g,b, may be repeated
        #[arg(long = "target", short, required = true)]
        targets: Vec<Rgb>,

        /// JSON file with solver settings
        #[arg(long, short)]
        config: Option<PathBuf>,

        #[arg(long)]
        tolerance: Option<f64>,

        #[arg(long)]
        max_iterations: Option<usize>,

        #[arg(long)]
        step_size: Option<f64>,

        /// Only stop on a small error or after all iterations
        #[arg(long)]
        no_stall: bool,

        /// Write an SVG preview of the first target
        #[arg(long)]
        preview: Option<PathBuf>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InkSpec {
    Hex(String),
    Cmyk(Cmyk),
}

#[derive(Serialize)]
struct Conversion {
    hex: String,
    rgb: Rgb,
    cmyk: Cmyk,
    composition: Vec<ChartEntry>,
}

#[derive(Serialize)]
struct Picked {
    hex: String,
    cmyk: Cmyk,
    #[serde(skip_serializing_if = "Option::is_none")]
    loupe: Option<Vec<String>>,
}

#[derive(Serialize)]
struct Solution {
    target: String,
    mixed: String,
    ratios: Vec<ChartEntry>,
    error_percent: i64,
    result: MixResult,
}

fn read_palette(path: &Path) -> Result<Vec<Cmyk>> {
    let fh = std::fs::File::open(path)
        .with_context(|| format!("Failed to open palette {}", path.display()))?;
    let specs: Vec<InkSpec> = serde_json::from_reader(fh)?;

    specs
        .into_iter()
        .map(|spec| match spec {
            InkSpec::Hex(hex) => Ok(inkmix::hex_to_cmyk(&hex)?),
            InkSpec::Cmyk(cmyk) => Ok(cmyk),
        })
        .collect()
}

fn read_config(path: Option<&Path>) -> Result<SolverConfig> {
    match path {
        Some(path) => {
            let fh = std::fs::File::open(path)
                .with_context(|| format!("Failed to open config {}", path.display()))?;
            Ok(serde_json::from_reader(fh)?)
        }
        None => Ok(SolverConfig::default()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_cmyk(cmyk: &Cmyk) -> String {
    format!("{:.3}, {:.3}, {:.3}, {:.3}", cmyk.c, cmyk.m, cmyk.y, cmyk.k)
}

fn print_chart(entries: &[ChartEntry]) {
    for entry in entries {
        println!("  {:<12} {:>4}%", entry.name, entry.value);
    }
}

fn convert(color: Rgb, json: bool) -> Result<()> {
    let cmyk = color.to_cmyk();
    let conversion = Conversion {
        hex: color.to_hex(),
        rgb: color,
        cmyk,
        composition: chart::composition(cmyk),
    };

    if json {
        return print_json(&conversion);
    }

    println!("hex   {}", conversion.hex);
    println!("rgb   {}, {}, {}", color.r, color.g, color.b);
    println!("cmyk  {}", format_cmyk(&cmyk));
    println!("composition");
    print_chart(&conversion.composition);

    Ok(())
}

fn pick(input: &Path, x: u32, y: u32, loupe: bool, json: bool) -> Result<()> {
    info!("Open image");
    let img = picker::open(input)?;
    let color = picker::pick(&img, x, y)?;

    let loupe_size = picker::loupe_extent(&img, picker::LOUPE_SIZE);

    let picked = Picked {
        hex: color.to_hex(),
        cmyk: color.to_cmyk(),
        loupe: loupe.then(|| {
            picker::loupe(&img, x, y, loupe_size)
                .into_iter()
                .map(Rgb::to_hex)
                .collect()
        }),
    };

    if json {
        return print_json(&picked);
    }

    println!("{}  cmyk {}", picked.hex, format_cmyk(&picked.cmyk));

    if let Some(grid) = &picked.loupe {
        for row in grid.chunks(loupe_size.max(1) as usize) {
            println!("{}", row.join(" "));
        }
    }

    Ok(())
}

fn build_config(
    file: Option<&Path>,
    tolerance: Option<f64>,
    max_iterations: Option<usize>,
    step_size: Option<f64>,
    no_stall: bool,
) -> Result<SolverConfig> {
    let mut config = read_config(file)?;

    if let Some(tolerance) = tolerance {
        config.tolerance = tolerance;
    }

    if let Some(max_iterations) = max_iterations {
        config.max_iterations = max_iterations;
    }

    if let Some(step_size) = step_size {
        config.step_size = step_size;
    }

    if no_stall {
        config.stall_detection = false;
    }

    config.validate()?;

    Ok(config)
}

fn run(opt: Options) -> Result<()> {
    match opt.command {
        Command::Convert { color } => convert(color, opt.json),
        Command::Pick { input, x, y, loupe } => pick(&input, x, y, loupe, opt.json),
        Command::Mix {
            inks,
            palette,
            targets,
            config,
            tolerance,
            max_iterations,
            step_size,
            no_stall,
            preview,
        } => {
            let config = build_config(
                config.as_deref(),
                tolerance,
                max_iterations,
                step_size,
                no_stall,
            )?;

            let mut palette = match palette {
                Some(path) => Palette::new(read_palette(&path)?),
                None => Palette::default(),
            };

            for ink in &inks {
                palette.push(ink.to_cmyk());
            }

            if palette.is_empty() {
                return Err(anyhow!("No inks given, use --ink or --palette"));
            }

            let targets = targets.iter().map(|rgb| rgb.to_cmyk()).collect::<Vec<_>>();

            info!("Mix {} inks for {} targets", palette.len(), targets.len());
            let results = targets
                .par_iter()
                .map(|target| mixer::calculate_ratios(palette.as_slice(), *target, &config))
                .collect::<inkmix::Result<Vec<_>>>()?;

            if let (Some(path), Some(target), Some(result)) =
                (preview, targets.first(), results.first())
            {
                info!("Write preview");
                inkmix::svg::write_preview(&path, &palette, target, result)?;
            }

            let solutions = targets
                .iter()
                .zip(results)
                .map(|(target, result)| Solution {
                    target: inkmix::cmyk_to_hex(*target),
                    mixed: inkmix::cmyk_to_hex(result.mixed_color),
                    ratios: chart::ratio_chart(&result.ratios),
                    error_percent: chart::error_percent(result.error),
                    result,
                })
                .collect::<Vec<_>>();

            if opt.json {
                return print_json(&solutions);
            }

            let inks = palette.to_hex();

            for solution in &solutions {
                println!(
                    "{} -> {} (error {}%, {:?} after {} iterations)",
                    solution.target,
                    solution.mixed,
                    solution.error_percent,
                    solution.result.termination,
                    solution.result.iterations
                );

                for (entry, ink) in solution.ratios.iter().zip(&inks) {
                    println!("  {:>3} {} {:>4}%", entry.name, ink, entry.value);
                }
            }

            Ok(())
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    run(Options::parse())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mix_with_repeated_flags() {
        let opt = Options::try_parse_from([
            "inkmix", "mix", "--ink", "#00ffff", "--ink", "255,0,255", "-t", "#8080ff", "-t",
            "0,0,0", "--no-stall", "--json",
        ])
        .unwrap();

        assert!(opt.json);

        match opt.command {
            Command::Mix {
                inks,
                targets,
                no_stall,
                ..
            } => {
                assert_eq!(inks, vec![Rgb::new(0, 255, 255), Rgb::new(255, 0, 255)]);
                assert_eq!(targets, vec![Rgb::new(128, 128, 255), Rgb::new(0, 0, 0)]);
                assert!(no_stall);
            }
            _ => panic!("expected mix command"),
        }
    }

    #[test]
    fn mix_requires_a_target() {
        assert!(Options::try_parse_from(["inkmix", "mix", "--ink", "#00ffff"]).is_err());
    }

    #[test]
    fn convert_accepts_hex_and_triples() {
        let cases = [
            ("#ff8000", Rgb::new(255, 128, 0)),
            ("1,2,3", Rgb::new(1, 2, 3)),
        ];

        for (arg, expected) in cases {
            let opt = Options::try_parse_from(["inkmix", "convert", arg]).unwrap();
            match opt.command {
                Command::Convert { color } => assert_eq!(color, expected),
                _ => panic!("expected convert command"),
            }
        }

        assert!(Options::try_parse_from(["inkmix", "convert", "#ff80"]).is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let config = build_config(None, Some(0.01), Some(5), None, true).unwrap();
        assert_eq!(config.tolerance, 0.01);
        assert_eq!(config.max_iterations, 5);
        assert_eq!(config.step_size, SolverConfig::default().step_size);
        assert!(!config.stall_detection);

        assert!(build_config(None, Some(-1.0), None, None, false).is_err());
    }

    #[test]
    fn ink_specs_accept_hex_and_objects() {
        let specs: Vec<InkSpec> =
            serde_json::from_str(r##"["#00ffff", {"c": 0.0, "m": 1.0, "y": 0.0, "k": 0.0}]"##)
                .unwrap();

        assert!(matches!(&specs[0], InkSpec::Hex(hex) if hex == "#00ffff"));
        assert!(matches!(&specs[1], InkSpec::Cmyk(cmyk) if *cmyk == Cmyk::MAGENTA));
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "solver.json", r#"{"step_size": 0.1, "max_iterations": 7}"#);

        let config = build_config(Some(path.as_path()), None, None, None, false).unwrap();
        assert_eq!(config.step_size, 0.1);
        assert_eq!(config.max_iterations, 7);

        let config = build_config(Some(path.as_path()), None, Some(3), None, false).unwrap();
        assert_eq!(config.step_size, 0.1);
        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.tolerance, SolverConfig::default().tolerance);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(build_config(Some(path.as_path()), None, None, None, false).is_err());
    }

    #[test]
    fn palette_file_mixes_hex_and_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "palette.json",
            r##"["#00ffff", {"c": 0, "m": 1, "y": 0, "k": 0}]"##,
        );

        assert_eq!(read_palette(&path).unwrap(), vec![Cmyk::CYAN, Cmyk::MAGENTA]);
    }

    #[test]
    fn palette_file_with_bad_hex_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "palette.json", r##"["#00ffff", "#zzzzzz"]"##);

        let err = read_palette(&path).unwrap_err();
        assert!(err.to_string().contains("#zzzzzz"), "{err}");
    }

    #[test]
    fn mix_without_inks_fails() {
        let opt = Options::try_parse_from(["inkmix", "mix", "-t", "#000000"]).unwrap();
        let err = run(opt).unwrap_err();
        assert!(err.to_string().contains("No inks given"), "{err}");
    }

    #[test]
    fn mix_writes_preview() {
        let dir = tempfile::tempdir().unwrap();
        let palette = write_file(&dir, "palette.json", r##"["#00ffff"]"##);
        let preview = dir.path().join("preview.svg");

        let opt = Options::try_parse_from([
            "inkmix",
            "mix",
            "--palette",
            palette.to_str().unwrap(),
            "--ink",
            "255,0,255",
            "-t",
            "#8080ff",
            "--preview",
            preview.to_str().unwrap(),
            "--json",
        ])
        .unwrap();

        run(opt).unwrap();

        let svg = std::fs::read_to_string(&preview).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("#00ffff"));
        assert!(svg.contains("#ff00ff"));
        assert!(svg.contains("#8080ff"));
    }

    #[test]
    fn cmyk_output_has_fixed_precision() {
        assert_eq!(
            format_cmyk(&Rgb::new(235, 0, 0).to_cmyk()),
            "0.000, 1.000, 1.000, 0.078"
        );
    }
}
