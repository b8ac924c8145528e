//! gen-epub - Convert a plain-text novel transcript into an EPUB

mod archive;
mod book;
mod config;
mod package;
mod pages;

use anyhow::{Context, Result};
use book::Selection;
use clap::{Parser, Subcommand};
use config::EpubConfig;
use package::{Assets, CoverImage, Metadata};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "gen-epub")]
#[command(about = "Convert a plain-text novel transcript into an EPUB", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the transcript (TOC, front matter and chapters in one file)
    input: Option<PathBuf>,

    /// Output file path (default: <input-name>.epub)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (default: <config dir>/gen-epub/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Separate TOC listing, one chapter per line; listed chapters without
    /// text are marked as pending
    #[arg(long)]
    toc: Option<PathBuf>,

    /// Chapter range to include by ordinal (e.g., "1-2" or "5")
    #[arg(long)]
    chapters: Option<String>,

    /// Enable debug output
    #[arg(short, long, default_value_t = false, global = true)]
    debug: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the partitioned transcript as JSON
    Inspect {
        /// Path to the transcript
        input: PathBuf,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the book title
    SetTitle { title: String },
    /// Set the book author
    SetAuthor { author: String },
    /// Set the language tag (e.g., zh-CN)
    SetLanguage { language: String },
    /// Set the cover image
    SetCover { path: PathBuf },
    /// Set the stylesheet packaged with the book
    SetStylesheet { path: PathBuf },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let config_path = args.config.as_deref();

    match &args.command {
        Some(Commands::Config { action }) => {
            return handle_config_command(action, config_path);
        }
        Some(Commands::Inspect { input }) => {
            return inspect(input, config_path);
        }
        None => {}
    }

    let input = args
        .input
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Transcript path is required. Run 'gen-epub --help' for usage."))?;

    if !input.exists() {
        anyhow::bail!("Transcript not found: {}", input.display());
    }

    let config = EpubConfig::load(config_path).context("Failed to load configuration")?;

    let output = args.output.clone().unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default();
        input.with_file_name(format!("{}.epub", stem.to_string_lossy()))
    });

    let chapters = args
        .chapters
        .as_deref()
        .map(parse_chapter_range)
        .transpose()?;

    log::debug!("Input: {}", input.display());
    log::debug!("Output: {}", output.display());
    log::debug!("Config: {:?}", config);

    convert(&input, &output, &config, args.toc.as_deref(), chapters)?;

    let size_kb = fs::metadata(&output)?.len() as f64 / 1024.0;
    log::info!("EPUB generated at: {} ({:.1} KB)", output.display(), size_kb);

    Ok(())
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_target(false)
        .format_timestamp(None)
        .init();
}

/// Partition the transcript at `input` and write the EPUB to `output`.
fn convert(
    input: &Path,
    output: &Path,
    config: &EpubConfig,
    toc: Option<&Path>,
    chapters: Option<RangeInclusive<usize>>,
) -> Result<()> {
    let raw = read_text(input)?;
    let partition = novel_text::partition_with(&raw, &config.partition_options());

    log::info!(
        "Chapters: {}, front matter: {}, listed in TOC: {}",
        partition.chapters.len(),
        if partition.front_matter.is_some() { "yes" } else { "no" },
        partition.toc.len()
    );

    let toc_entries = match toc {
        Some(path) => {
            let entries = novel_text::parse_toc(&read_text(path)?);
            log::info!("TOC listing: {} entries", entries.len());
            Some(entries)
        }
        None => None,
    };

    let selection = Selection {
        chapters,
        toc: toc_entries.as_deref(),
    };
    let book = book::assemble(&partition, &selection);

    if book.sections.is_empty() {
        if partition.chapters.is_empty() {
            anyhow::bail!("Nothing to write: no text found in {}", input.display());
        }
        anyhow::bail!(
            "Nothing to write: no front matter and no chapters selected from {}",
            input.display()
        );
    }

    let assets = load_assets(config)?;
    let metadata = Metadata {
        title: config.title.clone(),
        author: config.author.clone(),
        language: config.language.clone(),
        identifier: config
            .identifier
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        date: chrono::Local::now().format("%Y-%m-%d").to_string(),
    };

    let entries = package::package(&book, &metadata, &assets);
    archive::write_epub(output, &entries).context("Failed to write EPUB")?;

    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Read the configured stylesheet and cover, falling back to the defaults.
fn load_assets(config: &EpubConfig) -> Result<Assets> {
    let mut assets = Assets::default();

    if let Some(path) = &config.stylesheet {
        assets.stylesheet = read_text(path)?;
    }

    if let Some(path) = &config.cover {
        if path.exists() {
            let data = fs::read(path)
                .with_context(|| format!("Failed to read cover {}", path.display()))?;
            assets.cover = Some(CoverImage::new(data));
        } else {
            log::warn!("Cover image not found at {}", path.display());
        }
    }

    Ok(assets)
}

fn inspect(input: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = EpubConfig::load(config_path).context("Failed to load configuration")?;
    let raw = read_text(input)?;
    let partition = novel_text::partition_with(&raw, &config.partition_options());
    println!("{}", serde_json::to_string_pretty(&partition)?);
    Ok(())
}

/// Parse chapter range string like "1-10" or "5" (ordinals start at 1).
fn parse_chapter_range(range: &str) -> Result<RangeInclusive<usize>> {
    let (start, end) = match range.split_once('-') {
        Some((start, end)) => (
            start.trim().parse::<usize>().context("Invalid start chapter")?,
            end.trim().parse::<usize>().context("Invalid end chapter")?,
        ),
        None => {
            let chapter = range.trim().parse::<usize>().context("Invalid chapter number")?;
            (chapter, chapter)
        }
    };

    if start == 0 || end < start {
        anyhow::bail!("Invalid chapter range '{}'. Use 'start-end' with 1 <= start <= end", range);
    }

    Ok(start..=end)
}

fn handle_config_command(action: &ConfigAction, config_path: Option<&Path>) -> Result<()> {
    let mut config = EpubConfig::load(config_path)?;

    match action {
        ConfigAction::Show => {
            let path = match config_path {
                Some(p) => p.to_path_buf(),
                None => EpubConfig::default_path()?,
            };
            println!("Configuration file: {}", path.display());
            println!();
            print!("{}", toml::to_string_pretty(&config)?);
            return Ok(());
        }
        ConfigAction::SetTitle { title } => {
            config.title = title.clone();
            println!("Title set to: {}", config.title);
        }
        ConfigAction::SetAuthor { author } => {
            config.author = author.clone();
            println!("Author set to: {}", config.author);
        }
        ConfigAction::SetLanguage { language } => {
            config.language = language.clone();
            println!("Language set to: {}", config.language);
        }
        ConfigAction::SetCover { path } => {
            config.cover = Some(path.clone());
            println!("Cover image set to: {}", path.display());
        }
        ConfigAction::SetStylesheet { path } => {
            config.stylesheet = Some(path.clone());
            println!("Stylesheet set to: {}", path.display());
        }
    }

    config.save(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    const TRANSCRIPT: &str = "\
目  录
第  一  回  甄士隐梦幻识通灵　贾雨村风尘怀闺秀\t1
第  二  回  贾夫人仙逝扬州城　冷子兴演说荣国府\t9

扉页题诗：
浮生着甚苦奔忙，盛席华筵终散场。

第一回　甄士隐梦幻识通灵　贾雨村风尘怀闺秀
此开卷第一回也。作者自云：因曾历过一番梦幻之后，故将真事隐去【甲戌侧批：托言】。
第二回　贾夫人仙逝扬州城　冷子兴演说荣国府
诗云：
一局输赢料不真，
";

    fn read_entry(archive: &mut ZipArchive<fs::File>, name: &str) -> String {
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    #[test]
    fn test_parse_chapter_range() {
        assert_eq!(parse_chapter_range("1-2").unwrap(), 1..=2);
        assert_eq!(parse_chapter_range("5").unwrap(), 5..=5);
        assert_eq!(parse_chapter_range(" 3 - 7 ").unwrap(), 3..=7);
    }

    #[test]
    fn test_parse_chapter_range_rejects_bad_input() {
        assert!(parse_chapter_range("0").is_err());
        assert!(parse_chapter_range("4-2").is_err());
        assert!(parse_chapter_range("a-b").is_err());
        assert!(parse_chapter_range("").is_err());
    }

    #[test]
    fn test_convert_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("full.txt");
        let output = dir.path().join("dist").join("book.epub");
        fs::write(&input, TRANSCRIPT).unwrap();

        let config = EpubConfig {
            identifier: Some("test-id".to_string()),
            ..EpubConfig::default()
        };
        convert(&input, &output, &config, None, None).unwrap();

        let mut archive = ZipArchive::new(fs::File::open(&output).unwrap()).unwrap();
        assert_eq!(archive.by_index(0).unwrap().name(), "mimetype");

        let chapter = read_entry(&mut archive, "OEBPS/chapter_1.html");
        assert!(chapter.contains("<h1>第一回 甄士隐梦幻识通灵　贾雨村风尘怀闺秀</h1>"));
        assert!(chapter.contains(r#"<span class="comment">【甲戌侧批：托言】</span>"#));

        let intro = read_entry(&mut archive, "OEBPS/intro.html");
        assert!(intro.contains("浮生着甚苦奔忙"));

        let opf = read_entry(&mut archive, "OEBPS/content.opf");
        assert!(opf.contains("test-id"));
        assert!(opf.contains(r#"<itemref idref="chap_2"/>"#));
    }

    #[test]
    fn test_convert_with_toc_and_range() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("full.txt");
        let toc = dir.path().join("toc.txt");
        let output = dir.path().join("book.epub");
        fs::write(&input, TRANSCRIPT).unwrap();
        fs::write(
            &toc,
            "第  一  回  甄士隐梦幻识通灵　贾雨村风尘怀闺秀\t1\n第  二  回  贾夫人仙逝扬州城　冷子兴演说荣国府\t9\n",
        )
        .unwrap();

        convert(&input, &output, &EpubConfig::default(), Some(&toc), Some(1..=1)).unwrap();

        let mut archive = ZipArchive::new(fs::File::open(&output).unwrap()).unwrap();
        assert!(archive.by_name("OEBPS/chapter_2.html").is_err());

        let listing = read_entry(&mut archive, "OEBPS/toc.html");
        assert!(listing.contains(r#"<a href="chapter_1.html">"#));
        assert!(listing.contains("第二回 贾夫人仙逝扬州城　冷子兴演说荣国府 (待补)"));
    }

    #[test]
    fn test_convert_empty_transcript_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("empty.txt");
        fs::write(&input, "  \n").unwrap();

        let result = convert(&input, &dir.path().join("out.epub"), &EpubConfig::default(), None, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_convert_range_selecting_nothing_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("chapters.txt");
        let output = dir.path().join("out.epub");
        fs::write(&input, "第一回 开篇\n正文一\n第二回 续篇\n正文二\n").unwrap();

        let err = convert(&input, &output, &EpubConfig::default(), None, Some(50..=60))
            .unwrap_err()
            .to_string();
        assert!(err.contains("no chapters selected"), "{err}");
        assert!(!output.exists());
    }

    #[test]
    fn test_load_assets_missing_cover_is_skipped() {
        let config = EpubConfig {
            cover: Some(PathBuf::from("/nonexistent/cover.png")),
            ..EpubConfig::default()
        };
        let assets = load_assets(&config).unwrap();
        assert!(assets.cover.is_none());
        assert_eq!(assets.stylesheet, package::DEFAULT_STYLESHEET);
    }
}
