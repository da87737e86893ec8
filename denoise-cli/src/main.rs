use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use denoise_client::DemoClient;
use denoise_core::api::{DenoiseRequest, Variant};
use denoise_core::health::{Connectivity, HEALTH_POLL_INTERVAL_MS};
use denoise_core::meta::meta_text;
use denoise_core::zoom::ZoomWindow;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const BASE_URL_ENV: &str = "DENOISE_DEMO_URL";

#[derive(Parser)]
#[command(author, version, about = "Drive the denoise demo backend from the terminal")]
struct Cli {
    /// Backend base URL [env: DENOISE_DEMO_URL] [default: http://127.0.0.1:5000]
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Probe /health once, or keep polling every 3s with --watch
    Health {
        #[arg(long)]
        watch: bool,
    },
    /// Print sample metadata the way the demo page shows it
    Meta {
        sample: String,
        #[arg(long, default_value = "")]
        model: String,
        #[arg(long, default_value_t = 0.0)]
        zoom_start: f64,
    },
    /// Run the server-side denoiser on a sample
    Denoise {
        sample: String,
        #[arg(long, default_value = "")]
        model: String,
        #[arg(long, default_value_t = 0.0)]
        zoom_start: f64,
    },
    /// Download spectrogram images (full and zoomed)
    Fetch {
        sample: String,
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
        #[arg(long, default_value_t = 0.0)]
        zoom_start: f64,
        /// Also fetch the denoised images (requires a prior denoise)
        #[arg(long)]
        denoised: bool,
    },
    /// Reset the server-side zoom state of a sample
    ResetZoom { sample: String },
    /// Discard the denoised result of a sample
    Erase { sample: String },
}

fn resolve_base_url(flag: Option<String>, env: Option<String>) -> String {
    flag.or(env)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// File-system friendly stem of a sample name (`"bird call.wav"` -> `"bird_call"`).
fn sample_stem(sample: &str) -> String {
    let stem = Path::new(sample)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(sample);
    let cleaned: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() { "sample".to_string() } else { cleaned }
}

fn output_name(sample: &str, variant: Variant, zoom: Option<&ZoomWindow>, stamp: &str) -> String {
    let stem = sample_stem(sample);
    match zoom {
        Some(w) => format!("{stem}_{}_zoom_{:.3}s_{stamp}.png", variant.as_str(), w.start_s),
        None => format!("{stem}_{}_{stamp}.png", variant.as_str()),
    }
}

async fn watch_health(client: &DemoClient) {
    let mut ticker = tokio::time::interval(Duration::from_millis(HEALTH_POLL_INTERVAL_MS as u64));
    let mut last = Connectivity::Unknown;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        // Ctrl-C also interrupts a probe that is still waiting on the server
        let probe = async {
            ticker.tick().await;
            Connectivity::from_probe(client.is_healthy().await)
        };
        tokio::select! {
            now = probe => {
                if now != last {
                    let stamp = chrono::Local::now().format("%H:%M:%S");
                    println!("[{stamp}] {}", now.label());
                    last = now;
                }
            }
            _ = &mut ctrl_c => break,
        }
    }
}

async fn fetch_images(
    client: &DemoClient,
    sample: &str,
    out: &Path,
    window: &ZoomWindow,
    denoised: bool,
) -> Result<(), Box<dyn Error>> {
    tokio::fs::create_dir_all(out).await?;
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H%M%S").to_string();

    let mut variants = vec![Variant::Noisy];
    if denoised {
        variants.push(Variant::Denoised);
    }

    for variant in variants {
        let full = client.spectrogram(sample, variant).await?;
        let path = out.join(output_name(sample, variant, None, &stamp));
        tokio::fs::write(&path, &full).await?;
        println!("wrote {} ({} bytes)", path.display(), full.len());

        let zoomed = client.zoom_spectrogram(sample, variant, window).await?;
        let path = out.join(output_name(sample, variant, Some(window), &stamp));
        tokio::fs::write(&path, &zoomed).await?;
        println!("wrote {} ({} bytes)", path.display(), zoomed.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let base_url = resolve_base_url(cli.base_url, std::env::var(BASE_URL_ENV).ok());
    let client = DemoClient::new(&base_url)?;
    log::debug!("Using backend at {}", client.base_url());

    match cli.command {
        Command::Health { watch: true } => watch_health(&client).await,
        Command::Health { watch: false } => {
            let state = Connectivity::from_probe(client.is_healthy().await);
            println!("{}", state.label());
            if state != Connectivity::Connected {
                return Err(format!("{base_url} is unreachable").into());
            }
        }
        Command::Meta { sample, model, zoom_start } => {
            let meta = client.meta(&sample).await?;
            println!("{}", meta_text(&meta, &model, ZoomWindow::at(zoom_start).start_s));
        }
        Command::Denoise { sample, model, zoom_start } => {
            let req = DenoiseRequest::new(&model, &ZoomWindow::at(zoom_start));
            let ack = client.denoise(&sample, &req).await?;
            if !ack.ok {
                return Err("denoise was not acknowledged".into());
            }
            println!("denoised {sample}");
        }
        Command::Fetch { sample, out, zoom_start, denoised } => {
            fetch_images(&client, &sample, &out, &ZoomWindow::at(zoom_start), denoised).await?;
        }
        Command::ResetZoom { sample } => {
            client.reset_zoom(&sample).await?;
            println!("zoom reset for {sample}");
        }
        Command::Erase { sample } => {
            client.erase_edits(&sample).await?;
            println!("edits erased for {sample}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_precedence() {
        assert_eq!(
            resolve_base_url(Some("http://a:1".into()), Some("http://b:2".into())),
            "http://a:1"
        );
        assert_eq!(resolve_base_url(None, Some("http://b:2".into())), "http://b:2");
        assert_eq!(resolve_base_url(None, None), DEFAULT_BASE_URL);
        assert_eq!(resolve_base_url(Some("  ".into()), None), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_sample_stem() {
        assert_eq!(sample_stem("bird call.wav"), "bird_call");
        assert_eq!(sample_stem("fan-01.wav"), "fan-01");
        assert_eq!(sample_stem(""), "sample");
    }

    #[test]
    fn test_output_names() {
        let w = ZoomWindow::at(2.5);
        assert_eq!(
            output_name("hum.wav", Variant::Noisy, None, "2026-01-02_030405"),
            "hum_noisy_2026-01-02_030405.png"
        );
        assert_eq!(
            output_name("hum.wav", Variant::Denoised, Some(&w), "t"),
            "hum_denoised_zoom_2.500s_t.png"
        );
    }

    #[test]
    fn test_cli_parses_fetch() {
        let cli = Cli::try_parse_from([
            "denoise-demo", "--base-url", "http://h:1", "fetch", "x.wav", "-o", "out", "--zoom-start", "4",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://h:1"));
        match cli.command {
            Command::Fetch { sample, out, zoom_start, denoised } => {
                assert_eq!(sample, "x.wav");
                assert_eq!(out, PathBuf::from("out"));
                assert_eq!(zoom_start, 4.0);
                assert!(!denoised);
            }
            _ => panic!("expected fetch"),
        }
    }
}
