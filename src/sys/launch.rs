use coverflow::TileUrl;
use std::io;
use std::process::{Command, Stdio};

/// Hands `url` to the desktop's default handler.
pub fn open_url(url: &TileUrl) -> io::Result<()> {
    if url.is_empty() {
        log::debug!("Tile has no link, nothing to open");
        return Ok(());
    }
    Command::new("xdg-open")
        .arg(url.as_str())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    log::info!("Opened {}", url);
    Ok(())
}
