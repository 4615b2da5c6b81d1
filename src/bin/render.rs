use anyhow::{Context, bail};
use bracket_data::BracketDocument;
use bracket_data::teams::TeamRegistry;
use circlebracket::{Bracket, Settings, SkiaSurface};
use log::info;

struct CliOptions {
    bracket_path: String,
    teams_path: String,
    out_path: String,
    size: u32,
    scale: f32,
    font_path: Option<String>,
    click: Option<(f32, f32)>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let Some(options) = parse_args()? else {
        return Ok(());
    };

    let bracket_json = tokio::fs::read_to_string(&options.bracket_path)
        .await
        .with_context(|| format!("reading bracket document {}", options.bracket_path))?;
    let document = BracketDocument::from_json(&bracket_json)
        .with_context(|| format!("parsing bracket document {}", options.bracket_path))?;
    for issue in document.validate() {
        log::warn!("bracket data: {issue}");
    }

    let teams_json = tokio::fs::read_to_string(&options.teams_path)
        .await
        .with_context(|| format!("reading team registry {}", options.teams_path))?;
    let registry = TeamRegistry::from_json(&teams_json)
        .with_context(|| format!("parsing team registry {}", options.teams_path))?;
    info!(
        "loaded {} season with {} teams in the registry",
        document.year,
        registry.len()
    );

    let mut surface = SkiaSurface::new(options.size)
        .with_context(|| format!("allocating a {0}x{0} surface", options.size))?;
    if let Some(font_path) = &options.font_path {
        let bytes = tokio::fs::read(font_path)
            .await
            .with_context(|| format!("reading font {font_path}"))?;
        surface = surface.with_font(bytes);
    }

    let settings = Settings {
        scale: options.scale,
        ..Settings::default()
    };
    let mut bracket = Bracket::new(registry, settings);
    bracket.set_bracket(Some(document));
    bracket.render(&mut surface).await;

    if let Some((x, y)) = options.click {
        match bracket.hit_test(x, y) {
            Some(game) => println!("{}", serde_json::to_string_pretty(game)?),
            None => println!("null"),
        }
    }

    let png = surface.to_png().context("encoding PNG")?;
    tokio::fs::write(&options.out_path, png)
        .await
        .with_context(|| format!("writing {}", options.out_path))?;
    info!("wrote {}", options.out_path);
    Ok(())
}

/// `Ok(None)` means help/version was printed and we are done.
fn parse_args() -> anyhow::Result<Option<CliOptions>> {
    let mut bracket_path = None;
    let mut teams_path = None;
    let mut out_path = String::from("bracket.png");
    let mut size = 1000u32;
    let mut scale = 1.0f32;
    let mut font_path = None;
    let mut click = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", usage_text());
                return Ok(None);
            }
            "-V" | "--version" => {
                println!("circlebracket {}", env!("CARGO_PKG_VERSION"));
                return Ok(None);
            }
            "--bracket" => bracket_path = Some(required_value(&mut args, "--bracket")?),
            "--teams" => teams_path = Some(required_value(&mut args, "--teams")?),
            "--out" => out_path = required_value(&mut args, "--out")?,
            "--size" => {
                size = required_value(&mut args, "--size")?
                    .parse()
                    .context("--size expects a pixel count")?;
            }
            "--scale" => {
                scale = required_value(&mut args, "--scale")?
                    .parse()
                    .context("--scale expects a number")?;
            }
            "--font" => font_path = Some(required_value(&mut args, "--font")?),
            "--click" => {
                let x = required_value(&mut args, "--click")?
                    .parse()
                    .context("--click expects two numbers")?;
                let y = required_value(&mut args, "--click")?
                    .parse()
                    .context("--click expects two numbers")?;
                click = Some((x, y));
            }
            _ => {
                eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
                std::process::exit(2);
            }
        }
    }

    let Some(bracket_path) = bracket_path else {
        bail!("--bracket is required\n\n{}", usage_text());
    };
    let Some(teams_path) = teams_path else {
        bail!("--teams is required\n\n{}", usage_text());
    };

    Ok(Some(CliOptions {
        bracket_path,
        teams_path,
        out_path,
        size,
        scale,
        font_path,
        click,
    }))
}

fn required_value(args: &mut impl Iterator<Item = String>, flag: &str) -> anyhow::Result<String> {
    args.next()
        .with_context(|| format!("{flag} expects a value\n\n{}", usage_text()))
}

fn usage_text() -> &'static str {
    "circlebracket - render a tournament bracket as a circular PNG

Usage:
  circlebracket --bracket <bracket.json> --teams <teams.json> [options]

Options:
  --out <path>      Output PNG path (default bracket.png)
  --size <px>       Square surface size in pixels (default 1000)
  --scale <n>       Device pixel ratio for margins, strokes, and text
  --font <path>     TTF/OTF font for the title, labels, and seed numbers
  --click <x> <y>   After rendering, print the game at that point as JSON
  --help            Show this help
  --version         Show the version"
}
