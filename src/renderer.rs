use std::f32::consts::TAU;

use futures_util::future::join_all;
use log::{debug, warn};
use tiny_skia::Color;

use bracket_data::teams::TeamRegistry;
use bracket_data::{BracketDocument, Game, Quadrant};

use crate::geometry;
use crate::hittest::{self, HitRegion, HitShape};
use crate::images::{LogoCache, LogoFuture, desaturate};
use crate::seeds;
use crate::surface::{DrawSurface, parse_color};

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Invoked when a click selects a game (or deselects, with `None`). The
/// second argument says whether seed numbers are meaningful for the loaded
/// bracket, so the consumer can hide them in its own game details view.
pub type SelectCallback = Box<dyn Fn(Option<&Game>, bool) + Send>;

pub struct Settings {
    /// Device pixel ratio. Linear quantities (margins, strokes, font sizes)
    /// multiply by this, and incoming click coordinates do too.
    pub scale: f32,
    /// Gap between the outer ring and the surface edge, in logical pixels.
    pub margin: f32,
    /// Vertical band reserved for the title; the circle center shifts down
    /// by this much.
    pub title_height: f32,
    pub grid_stroke_width: f32,
    pub grid_color: Color,
    pub background: Color,
    /// Fill behind slots no team occupies yet.
    pub disc_color: Color,
    pub text_color: Color,
    pub on_select: Option<SelectCallback>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            margin: 10.0,
            title_height: 24.0,
            grid_stroke_width: 2.0,
            grid_color: Color::BLACK,
            background: Color::WHITE,
            disc_color: Color::from_rgba8(0xf2, 0xf2, 0xf2, 0xff),
            text_color: Color::BLACK,
            on_select: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Bracket renderer
// ---------------------------------------------------------------------------

/// One team's wedge for a render pass: placement already resolved, logo
/// still in flight.
struct SlotJob {
    round: u32,
    ring_slots: u32,
    slot: u32,
    code: String,
    background: Color,
    vacated: bool,
    logo: LogoFuture,
}

/// Draws a bracket document as concentric rings of wedges and answers
/// click queries against the result.
///
/// A render pass is resolution-independent: all geometry derives from the
/// surface dimensions at call time, so resizing is just re-rendering onto
/// a resized surface.
pub struct Bracket {
    settings: Settings,
    registry: TeamRegistry,
    document: Option<BracketDocument>,
    cache: LogoCache,
    regions: Vec<HitRegion>,
}

impl Bracket {
    pub fn new(registry: TeamRegistry, settings: Settings) -> Self {
        Self {
            settings,
            registry,
            document: None,
            cache: LogoCache::new(),
            regions: Vec::new(),
        }
    }

    /// Load a document (or unload with `None`). The hit-test index is
    /// cleared immediately; the drawing updates on the next render.
    pub fn set_bracket(&mut self, document: Option<BracketDocument>) {
        self.document = document;
        self.regions.clear();
    }

    pub fn document(&self) -> Option<&BracketDocument> {
        self.document.as_ref()
    }

    /// Regions recorded by the last render pass, outermost wedges first.
    pub fn hit_regions(&self) -> &[HitRegion] {
        &self.regions
    }

    /// Resolve surface-logical coordinates to the game drawn there.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<&Game> {
        let document = self.document.as_ref()?;
        hittest::resolve(
            &self.regions,
            document,
            x * self.settings.scale,
            y * self.settings.scale,
        )
    }

    /// Handle a pointer click: resolve it and notify the selection
    /// callback either way.
    pub fn click(&self, x: f32, y: f32) -> Option<&Game> {
        let game = self.hit_test(x, y);
        self.notify(game);
        game
    }

    fn notify(&self, game: Option<&Game>) {
        if let Some(callback) = &self.settings.on_select {
            let display_seeds = self
                .document
                .as_ref()
                .and_then(|d| d.display_seeds)
                .unwrap_or(true);
            callback(game, display_seeds);
        }
    }

    /// Full render pass. Logo loads for all slots are kicked off up front
    /// and awaited together; the champion medallion waits until the rest
    /// of the circle is settled.
    pub async fn render(&mut self, surface: &mut dyn DrawSurface) {
        // A fresh pass always starts deselected.
        self.notify(None);
        self.regions.clear();

        // Snapshot the document so slot jobs can borrow the cache and
        // registry freely while it is in scope.
        let Some(document) = self.document.clone() else {
            debug!("no bracket loaded; nothing to draw");
            return;
        };
        let document = &document;

        let scale = self.settings.scale;
        let width = surface.width() as f32;
        let height = surface.height() as f32;
        // The title band comes out of the circle's budget: the center
        // shifts down by half the band so the disc clears it and still
        // fits the bottom edge.
        let band = self.settings.title_height * scale;
        let half = (width.min(height) - band) / 2.0;
        let center_x = width / 2.0;
        let center_y = (height + band) / 2.0;
        let margin = self.settings.margin * scale;

        surface.clear(self.settings.background);

        // A flagged tournament (e.g. "postponed") renders as a message
        // instead of a bracket.
        if let Some(status) = document.status.as_deref().filter(|s| !s.is_empty()) {
            surface.fill_text(status, center_x, center_y, 28.0 * scale, self.settings.text_color);
            return;
        }

        let title = format!("{} NCAA Men's Basketball Tournament", document.year);
        surface.fill_text(
            &title,
            center_x,
            margin + band / 2.0,
            22.0 * scale,
            self.settings.text_color,
        );

        let num_rounds = document.num_rounds();
        if num_rounds < 2 {
            debug!("document has no renderable games");
            return;
        }
        let num_entries = document.num_entries();

        if let Some(disc) = geometry::circle_path(center_x, center_y, half - margin) {
            surface.fill_path(&disc, self.settings.disc_color);
        }

        self.draw_region_labels(surface, document, center_x, center_y, half, margin);

        if document.display_seeds.unwrap_or(true) {
            self.draw_seed_numbers(
                surface, num_rounds, num_entries, center_x, center_y, half, margin,
            );
        }

        // Fan out: one cache lookup per occupied slot. Failures were
        // already folded into the handle type, so the join below cannot
        // fail, only produce blank slots.
        let mut jobs: Vec<SlotJob> = Vec::new();
        for game in document.renderable_games() {
            for side in [&game.home, &game.away] {
                if side.is_placeholder() {
                    continue;
                }
                let Some(quadrant) = game
                    .region
                    .or_else(|| document.find_team_region(&side.code))
                else {
                    warn!("no originating region for {} in round {}", side.code, game.round);
                    continue;
                };
                let slot =
                    match seeds::translate_to_slot(quadrant, game.round, side.seed, num_rounds) {
                        Ok(slot) => slot,
                        Err(err) => {
                            warn!("cannot place {}: {err}", side.code);
                            continue;
                        }
                    };
                let Some(team) = self.registry.get(&side.code) else {
                    warn!("no visual identity for {}; slot left blank", side.code);
                    continue;
                };
                jobs.push(SlotJob {
                    round: game.round,
                    ring_slots: seeds::slots_in_ring(game.round, num_rounds),
                    slot,
                    code: side.code.clone(),
                    background: slot_background(team.logo.background.as_deref(), &team.primary_color),
                    vacated: side.vacated,
                    logo: self.cache.resolve(&side.code, &team.logo.url),
                });
            }
        }

        let handles = join_all(jobs.iter().map(|job| job.logo.clone())).await;

        let mut regions: Vec<HitRegion> = Vec::with_capacity(jobs.len() + 1);
        for (job, handle) in jobs.iter().zip(&handles) {
            let (outer, inner) = geometry::radii_for_round(job.round, num_rounds, half, margin);
            let (start_angle, end_angle) = geometry::slot_angles(job.ring_slots, job.slot);
            let Some(wedge) =
                geometry::wedge_path(center_x, center_y, outer, inner, start_angle, end_angle)
            else {
                continue;
            };
            surface.fill_path(&wedge, job.background);

            if let Some(image) = handle.image() {
                let bounds = geometry::wedge_bounds(
                    outer, inner, center_x, center_y, job.ring_slots, job.slot,
                );
                let (w, h) = geometry::scale_to_fit(
                    image.width(),
                    image.height(),
                    bounds.max_width,
                    bounds.max_height,
                );
                if w > 0 && h > 0 {
                    let x = bounds.x as f32 + (bounds.max_width as f32 - w as f32) / 2.0;
                    let y = bounds.y as f32 + (bounds.max_height as f32 - h as f32) / 2.0;
                    if job.vacated {
                        let gray = desaturate(image);
                        surface.draw_image(&gray, x, y, w as f32, h as f32, Some(&wedge));
                    } else {
                        surface.draw_image(image, x, y, w as f32, h as f32, Some(&wedge));
                    }
                }
            }

            regions.push(HitRegion {
                shape: HitShape::Wedge {
                    center_x,
                    center_y,
                    outer,
                    inner,
                    start_angle,
                    end_angle,
                },
                team_code: job.code.clone(),
                round: job.round,
            });
        }

        self.draw_grid(surface, num_rounds, center_x, center_y, half, margin);

        self.draw_champion(
            surface,
            document,
            &mut regions,
            num_rounds,
            center_x,
            center_y,
            half,
            margin,
        )
        .await;

        self.regions = regions;
    }

    fn draw_region_labels(
        &self,
        surface: &mut dyn DrawSurface,
        document: &BracketDocument,
        center_x: f32,
        center_y: f32,
        half: f32,
        margin: f32,
    ) {
        // All-or-nothing: a partially named set renders no labels at all.
        if !document.all_regions_named() {
            return;
        }
        let radius = (half - margin) * 0.55;
        for region in &document.regions {
            let Some(quadrant) = region.quadrant() else {
                warn!(
                    "region {:?} has unrecognized position {:?}",
                    region.name, region.position
                );
                continue;
            };
            let angle = TAU / 4.0 * (seeds::quadrant_index(quadrant) as f32 + 0.5);
            surface.fill_text(
                &region.name,
                center_x + radius * angle.cos(),
                center_y + radius * angle.sin(),
                20.0 * self.settings.scale,
                self.settings.text_color,
            );
        }
    }

    /// Seed numbers sit in the margin just outside the outer ring, one per
    /// first-round slot, in the same placement order as the teams.
    fn draw_seed_numbers(
        &self,
        surface: &mut dyn DrawSurface,
        num_rounds: u32,
        num_entries: u32,
        center_x: f32,
        center_y: f32,
        half: f32,
        margin: f32,
    ) {
        let (outer, _) = geometry::radii_for_round(1, num_rounds, half, margin);
        let radius = outer + margin * 0.45;
        let per_quadrant = (num_entries / 4).clamp(1, 16) as u8;

        for quadrant in Quadrant::ALL {
            for seed in 1..=per_quadrant {
                let Ok(slot) = seeds::translate_to_slot(quadrant, 1, seed, num_rounds) else {
                    continue;
                };
                let (a0, a1) = geometry::slot_angles(num_entries, slot);
                let mid = (a0 + a1) / 2.0;
                surface.fill_text(
                    &seed.to_string(),
                    center_x + radius * mid.cos(),
                    center_y + radius * mid.sin(),
                    10.0 * self.settings.scale,
                    self.settings.text_color,
                );
            }
        }
    }

    /// Ring circles and slot spokes, stroked over the logos so wedge edges
    /// stay crisp. The innermost ring is the medallion and gets no spokes.
    fn draw_grid(
        &self,
        surface: &mut dyn DrawSurface,
        num_rounds: u32,
        center_x: f32,
        center_y: f32,
        half: f32,
        margin: f32,
    ) {
        let stroke = self.settings.grid_stroke_width * self.settings.scale;
        for round in 1..=num_rounds {
            let (outer, inner) = geometry::radii_for_round(round, num_rounds, half, margin);
            if let Some(circle) = geometry::circle_path(center_x, center_y, outer) {
                surface.stroke_path(&circle, self.settings.grid_color, stroke);
            }
            if round == num_rounds {
                continue;
            }
            let ring_slots = seeds::slots_in_ring(round, num_rounds);
            for slot in 0..ring_slots {
                let (angle, _) = geometry::slot_angles(ring_slots, slot);
                if let Some(line) =
                    geometry::radial_line_path(center_x, center_y, outer, inner, angle)
                {
                    surface.stroke_path(&line, self.settings.grid_color, stroke);
                }
            }
        }
    }

    /// Champion medallion in the center disc once the championship game is
    /// complete. A complete game with no flagged winner is a vacated title
    /// and renders as a gray placeholder with no clickable region.
    #[allow(clippy::too_many_arguments)]
    async fn draw_champion(
        &mut self,
        surface: &mut dyn DrawSurface,
        document: &BracketDocument,
        regions: &mut Vec<HitRegion>,
        num_rounds: u32,
        center_x: f32,
        center_y: f32,
        half: f32,
        margin: f32,
    ) {
        let Some(game) = document.championship_game().filter(|g| g.is_complete) else {
            return;
        };
        let (radius, _) = geometry::radii_for_round(num_rounds, num_rounds, half, margin);
        let Some(disc) = geometry::circle_path(center_x, center_y, radius) else {
            return;
        };

        match game.winner() {
            Some(champion) => {
                let team = self.registry.get(&champion.code);
                let background = team
                    .map(|t| slot_background(t.logo.background.as_deref(), &t.primary_color))
                    .unwrap_or(Color::WHITE);
                surface.fill_path(&disc, background);

                if let Some(team) = team {
                    let handle = self.cache.resolve(&champion.code, &team.logo.url).await;
                    if let Some(image) = handle.image() {
                        let extent = (radius * 2.0) as u32;
                        let (w, h) =
                            geometry::scale_to_fit(image.width(), image.height(), extent, extent);
                        if w > 0 && h > 0 {
                            let x = center_x - w as f32 / 2.0;
                            let y = center_y - h as f32 / 2.0;
                            if champion.vacated {
                                let gray = desaturate(image);
                                surface.draw_image(&gray, x, y, w as f32, h as f32, Some(&disc));
                            } else {
                                surface.draw_image(image, x, y, w as f32, h as f32, Some(&disc));
                            }
                        }
                    }
                }

                // Restore the ring outline the medallion fill covered.
                surface.stroke_path(
                    &disc,
                    self.settings.grid_color,
                    self.settings.grid_stroke_width * self.settings.scale,
                );

                regions.push(HitRegion {
                    shape: HitShape::Disc {
                        center_x,
                        center_y,
                        radius,
                    },
                    team_code: champion.code.clone(),
                    round: game.round,
                });
            }
            None => {
                surface.fill_path(&disc, Color::from_rgba8(0x80, 0x80, 0x80, 0xff));
                surface.fill_text(
                    "Vacated",
                    center_x,
                    center_y,
                    14.0 * self.settings.scale,
                    self.settings.text_color,
                );
            }
        }
    }
}

/// Slot fill: explicit logo background, then the team's primary color,
/// then plain white.
fn slot_background(logo_background: Option<&str>, primary_color: &str) -> Color {
    logo_background
        .and_then(parse_color)
        .or_else(|| parse_color(primary_color))
        .unwrap_or(Color::WHITE)
}
