//! Directional landing resolution and powerup pickup overlap
//!
//! Landings are only evaluated while the body moves downward, within a small
//! tolerance band below the platform top, and with enough horizontal
//! footprint overlap. Powerup pickup is a plain AABB test.

use super::state::{Platform, PlatformKind, Player, Powerup};
use crate::consts::*;

/// Whether the player makes a valid landing on this platform:
/// falling, bottom edge inside `[top, top + LANDING_TOLERANCE]`, and at
/// least a third of the player's width overlapping.
pub fn platform_landing(player: &Player, platform: &Platform) -> bool {
    if !platform.active {
        return false;
    }
    // Never while ascending: prevents catching a platform from below
    if player.vel.y <= 0.0 {
        return false;
    }

    let bottom = player.bottom();
    let top = platform.top();
    if bottom < top || bottom > top + LANDING_TOLERANCE {
        return false;
    }

    let overlap = player.right().min(platform.right()) - player.pos.x.max(platform.pos.x);
    overlap >= player.width / 3.0
}

/// Resolve the first valid landing: snap the body onto the platform top,
/// start a Decaying countdown, and ride along with kinetic platforms.
pub fn resolve_landings(player: &mut Player, platforms: &mut [Platform], dt: f32) {
    for platform in platforms.iter_mut() {
        if !platform_landing(player, platform) {
            continue;
        }

        player.pos.y = platform.top() - player.height;
        player.vel.y = 0.0;
        player.jumping = false;
        player.grounded = true;
        platform.touch();

        match platform.kind {
            PlatformKind::Oscillating | PlatformKind::Wrapping => {
                player.pos.x += platform.velocity * dt;
            }
            PlatformKind::Static | PlatformKind::Decaying => {}
        }
        break;
    }
}

/// Plain AABB overlap, no directionality or tolerance
pub fn powerup_overlap(player: &Player, powerup: &Powerup) -> bool {
    let powerup_right = powerup.pos.x + powerup.size;
    let powerup_bottom = powerup.pos.y + powerup.size;
    !(powerup_right < player.pos.x
        || player.right() < powerup.pos.x
        || powerup_bottom < player.pos.y
        || player.bottom() < powerup.pos.y)
}
