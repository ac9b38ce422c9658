use clap::{ArgAction, Parser};
use log::{error, info, LevelFilter};
use sone_data::{Album, AlbumTree, DefaultBuilderFactory};
use sone_parser::{parse_sone, ConfigError, Configuration, SoneContent, ROOT};
use std::{fmt::Write, path::PathBuf, process::ExitCode};
use thiserror::Error as ThisError;

#[derive(Debug, Parser)]
#[command(
    name = "sone-archive",
    version,
    about = "Reads the content of identities out of a Sone configuration snapshot"
)]
struct Cli {
    /// Path to the snapshot properties file.
    snapshot: PathBuf,

    /// Id of an identity to read, may be given more than once. Defaults to
    /// every identity in the snapshot.
    #[arg(long = "sone")]
    sones: Vec<String>,

    /// Output the parsed content as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// More logging output, -vv for trace.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, ThisError)]
enum Error {
    #[error("Failed to load snapshot, cause: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to parse Sone {sone_id}, cause: {source}")]
    Parse {
        sone_id: String,
        #[source]
        source: sone_parser::Error,
    },
    #[error("Failed to write json, cause: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to format output")]
    Format(#[from] std::fmt::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, Error> {
    let configuration = Configuration::load(&cli.snapshot)?;

    let sone_ids: Vec<String> = if cli.sones.is_empty() {
        configuration
            .child_names(ROOT)
            .into_iter()
            .map(String::from)
            .collect()
    } else {
        cli.sones.clone()
    };
    info!("Reading {} Sones from {}", sone_ids.len(), cli.snapshot.display());

    let mut contents = Vec::new();
    for sone_id in sone_ids {
        let content = parse_sone(&configuration, &sone_id, &DefaultBuilderFactory)
            .map_err(|source| Error::Parse { sone_id, source })?;
        contents.push(content);
    }

    if cli.json {
        let mut output = serde_json::to_string_pretty(&contents)?;
        output.push('\n');
        return Ok(output);
    }

    let mut output = String::new();
    for content in &contents {
        write_summary(&mut output, content)?;
    }
    Ok(output)
}

fn write_summary(output: &mut String, content: &SoneContent) -> std::fmt::Result {
    writeln!(output, "Sone {}", content.sone_id)?;

    let profile = &content.profile;
    let name: Vec<&str> = [&profile.first_name, &profile.middle_name, &profile.last_name]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .collect();
    if !name.is_empty() {
        writeln!(output, "  name: {}", name.join(" "))?;
    }
    for field in &profile.fields {
        writeln!(output, "  {}: {}", field.name, field.value)?;
    }

    writeln!(output, "  posts: {}", content.posts.len())?;
    for post in &content.posts {
        match &post.recipient {
            Some(recipient) => writeln!(
                output,
                "    {} @{} to {}",
                post.id, post.time, recipient
            )?,
            None => writeln!(output, "    {} @{}", post.id, post.time)?,
        }
    }
    writeln!(output, "  replies: {}", content.replies.len())?;
    writeln!(output, "  friends: {}", content.friends.len())?;
    writeln!(
        output,
        "  likes: {} posts, {} replies",
        content.liked_post_ids.len(),
        content.liked_post_reply_ids.len()
    )?;
    writeln!(output, "  albums: {}", content.albums.len())?;
    for album in content.top_level_albums() {
        write_album(output, &content.albums, album, 2)?;
    }
    Ok(())
}

fn write_album(
    output: &mut String,
    tree: &AlbumTree,
    album: &Album,
    depth: usize,
) -> std::fmt::Result {
    let indent = "  ".repeat(depth);
    write!(
        output,
        "{}{} \"{}\" ({} images",
        indent,
        album.id,
        album.title,
        album.images().len()
    )?;
    if let Some(image) = album.album_image() {
        write!(output, ", album image {}", image)?;
    }
    writeln!(output, ")")?;
    for child in tree.children(album) {
        write_album(output, tree, child, depth + 1)?;
    }
    Ok(())
}
