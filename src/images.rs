use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use log::{debug, error};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tiny_skia::Pixmap;

// ---------------------------------------------------------------------------
// Logo resolution & cache
// ---------------------------------------------------------------------------

/// A resolved piece of team artwork. `Unavailable` is the sentinel for a
/// failed load: the slot renders with its background fill only, never
/// aborting the render pass.
#[derive(Debug, Clone)]
pub enum LogoHandle {
    Image(Arc<Pixmap>),
    Unavailable,
}

impl LogoHandle {
    pub fn image(&self) -> Option<&Arc<Pixmap>> {
        match self {
            LogoHandle::Image(pixmap) => Some(pixmap),
            LogoHandle::Unavailable => None,
        }
    }
}

pub type LogoFuture = Shared<BoxFuture<'static, LogoHandle>>;

#[derive(Debug)]
pub enum LogoError {
    Io(std::io::Error),
    Svg(String),
    Png(String),
    EmptyImage,
}

impl fmt::Display for LogoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogoError::Io(e) => write!(f, "read failed: {e}"),
            LogoError::Svg(e) => write!(f, "svg render failed: {e}"),
            LogoError::Png(e) => write!(f, "png decode failed: {e}"),
            LogoError::EmptyImage => write!(f, "image has zero size"),
        }
    }
}

impl std::error::Error for LogoError {}

impl From<std::io::Error> for LogoError {
    fn from(e: std::io::Error) -> Self {
        LogoError::Io(e)
    }
}

/// One drawable handle per team code per cache lifetime.
///
/// Concurrent `resolve` calls for the same code share a single in-flight
/// future, so a team appearing in six rounds still costs exactly one
/// read-and-decode. Entries are never evicted; the same teams recur across
/// bracket documents and renders.
#[derive(Default)]
pub struct LogoCache {
    entries: HashMap<String, LogoFuture>,
}

impl LogoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a logo reference (inline `<svg>` markup or a file path) to a
    /// shared future. The future always resolves; failures become
    /// [`LogoHandle::Unavailable`].
    pub fn resolve(&mut self, team_code: &str, logo_ref: &str) -> LogoFuture {
        if let Some(existing) = self.entries.get(team_code) {
            return existing.clone();
        }
        debug!("loading logo for {team_code}");
        let future = load_logo(team_code.to_owned(), logo_ref.to_owned())
            .boxed()
            .shared();
        self.entries.insert(team_code.to_owned(), future.clone());
        future
    }
}

async fn load_logo(team_code: String, logo_ref: String) -> LogoHandle {
    match try_load(&logo_ref).await {
        Ok(pixmap) => LogoHandle::Image(Arc::new(pixmap)),
        Err(e) => {
            error!("failed to load image for {team_code}: {e}");
            LogoHandle::Unavailable
        }
    }
}

async fn try_load(logo_ref: &str) -> Result<Pixmap, LogoError> {
    // Inline vector markup needs no I/O at all.
    if is_inline_svg(logo_ref) {
        return render_svg(logo_ref);
    }

    let bytes = tokio::fs::read(logo_ref).await?;
    if bytes.starts_with(b"<svg") || bytes.starts_with(b"<?xml") || logo_ref.ends_with(".svg") {
        let markup = String::from_utf8_lossy(&bytes);
        render_svg(&markup)
    } else {
        Pixmap::decode_png(&bytes).map_err(|e| LogoError::Png(e.to_string()))
    }
}

/// Logos in the registry are either a path or raw SVG markup, told apart by
/// a textual prefix check.
pub fn is_inline_svg(logo_ref: &str) -> bool {
    logo_ref.trim_start().starts_with("<svg")
}

fn render_svg(markup: &str) -> Result<Pixmap, LogoError> {
    let options = usvg::Options::default();
    let tree =
        usvg::Tree::from_str(markup, &options).map_err(|e| LogoError::Svg(e.to_string()))?;

    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or(LogoError::EmptyImage)?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Reduced-saturation copy of a logo, for vacated results.
pub fn desaturate(pixmap: &Pixmap) -> Pixmap {
    let mut copy = pixmap.clone();
    for px in copy.pixels_mut() {
        let gray = (0.299 * px.red() as f32 + 0.587 * px.green() as f32 + 0.114 * px.blue() as f32)
            .round()
            .min(px.alpha() as f32) as u8;
        if let Some(p) = tiny_skia::PremultipliedColorU8::from_rgba(gray, gray, gray, px.alpha()) {
            *px = p;
        }
    }
    copy
}
