use crate::geometry::{point_in_disc, point_in_wedge};
use bracket_data::{BracketDocument, Game};

// ---------------------------------------------------------------------------
// Hit-test index — drawable regions recorded during a render pass
// ---------------------------------------------------------------------------

/// Geometric shape of one recorded region, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitShape {
    Wedge {
        center_x: f32,
        center_y: f32,
        outer: f32,
        inner: f32,
        start_angle: f32,
        end_angle: f32,
    },
    /// The champion medallion.
    Disc {
        center_x: f32,
        center_y: f32,
        radius: f32,
    },
}

/// One entry of the hit-test index. The list is rebuilt on every render and
/// consulted on pointer clicks until the next render replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    pub shape: HitShape,
    pub team_code: String,
    pub round: u32,
}

impl HitRegion {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        match self.shape {
            HitShape::Wedge {
                center_x,
                center_y,
                outer,
                inner,
                start_angle,
                end_angle,
            } => point_in_wedge(x, y, center_x, center_y, outer, inner, start_angle, end_angle),
            HitShape::Disc {
                center_x,
                center_y,
                radius,
            } => point_in_disc(x, y, center_x, center_y, radius),
        }
    }
}

/// Resolve a click to the game whose region it landed in. Regions are tested
/// in insertion order; the first match wins, and the owning game is the
/// unique one at `(round, team_code)`.
pub fn resolve<'a>(
    regions: &[HitRegion],
    document: &'a BracketDocument,
    x: f32,
    y: f32,
) -> Option<&'a Game> {
    regions
        .iter()
        .find(|region| region.contains(x, y))
        .and_then(|region| document.game_for(region.round, &region.team_code))
}
