//! Upgrade catalog, rarity-weighted draws, and effect application.

use rand::Rng;

use thornwood_core::constants::*;
use thornwood_core::enums::{Rarity, UpgradeId};
use thornwood_core::player::{PlayerState, PlayerStats};
use thornwood_core::state::UpgradeOffer;

pub const COMMON_POOL: [UpgradeId; 5] = [
    UpgradeId::Damage,
    UpgradeId::MoveSpeed,
    UpgradeId::FireRate,
    UpgradeId::MaxHealth,
    UpgradeId::AuraRange,
];

pub const RARE_POOL: [UpgradeId; 5] = [
    UpgradeId::Pierce,
    UpgradeId::ProjectileSpeed,
    UpgradeId::AutoFire,
    UpgradeId::Knockback,
    UpgradeId::BulletSize,
];

pub const EPIC_POOL: [UpgradeId; 5] = [
    UpgradeId::Explode,
    UpgradeId::Multishot,
    UpgradeId::OrbitingShield,
    UpgradeId::LifeSteal,
    UpgradeId::Magnet,
];

pub const LEGENDARY_POOL: [UpgradeId; 4] = [
    UpgradeId::ChainLightning,
    UpgradeId::CriticalStrike,
    UpgradeId::SecondWind,
    UpgradeId::TimeFreeze,
];

/// Chance that a forced third slot becomes common rather than rare.
const FORCED_COMMON_CHANCE: f64 = 0.7;

/// Health restored when Vitality is picked.
const VITALITY_HEAL: f32 = 5.0;

pub fn pool(rarity: Rarity) -> &'static [UpgradeId] {
    match rarity {
        Rarity::Common => &COMMON_POOL,
        Rarity::Rare => &RARE_POOL,
        Rarity::Epic => &EPIC_POOL,
        Rarity::Legendary => &LEGENDARY_POOL,
    }
}

pub fn rarity_of(id: UpgradeId) -> Rarity {
    use UpgradeId::*;
    match id {
        Damage | MoveSpeed | FireRate | MaxHealth | AuraRange => Rarity::Common,
        Pierce | ProjectileSpeed | AutoFire | Knockback | BulletSize => Rarity::Rare,
        Explode | Multishot | OrbitingShield | LifeSteal | Magnet => Rarity::Epic,
        ChainLightning | CriticalStrike | SecondWind | TimeFreeze => Rarity::Legendary,
    }
}

pub fn name(id: UpgradeId) -> &'static str {
    use UpgradeId::*;
    match id {
        Damage => "Heavy Bullets",
        MoveSpeed => "Swift Boots",
        FireRate => "Quick Trigger",
        MaxHealth => "Vitality",
        AuraRange => "Extended Aura",
        Pierce => "Piercing Shots",
        ProjectileSpeed => "Velocity Boost",
        AutoFire => "Auto-Fire Module",
        Knockback => "Force Burst",
        BulletSize => "Mega Bullets",
        Explode => "Explosive Rounds",
        Multishot => "Double Shot",
        OrbitingShield => "Orbiting Shield",
        LifeSteal => "Vampiric Touch",
        Magnet => "XP Magnet",
        ChainLightning => "Chain Lightning",
        CriticalStrike => "Critical Strike",
        SecondWind => "Second Wind",
        TimeFreeze => "Time Freeze",
    }
}

pub fn description(id: UpgradeId) -> &'static str {
    use UpgradeId::*;
    match id {
        Damage => "+5% bullet damage",
        MoveSpeed => "+5% movement speed",
        FireRate => "+5% fire rate",
        MaxHealth => "+10 max health",
        AuraRange => "+10% aura range",
        Pierce => "Bullets pierce 1 enemy",
        ProjectileSpeed => "+15% projectile speed",
        AutoFire => "Reduce aura cooldown by 20%",
        Knockback => "Push enemies back when hit",
        BulletSize => "Bullets are 25% larger",
        Explode => "Bullets explode on hit",
        Multishot => "Fire 2 bullets at once",
        OrbitingShield => "Orbiting damage projectile",
        LifeSteal => "Heal 1 HP per 10 kills",
        Magnet => "+50% XP orb magnet range",
        ChainLightning => "Bullets chain to nearby enemies",
        CriticalStrike => "Every 5th shot deals 3x damage",
        SecondWind => "Temporary invincibility after level up",
        TimeFreeze => "Enemies slow for 2s after level up",
    }
}

pub fn offer(id: UpgradeId) -> UpgradeOffer {
    UpgradeOffer {
        id,
        rarity: rarity_of(id),
        name: name(id).to_string(),
        description: description(id).to_string(),
    }
}

/// The stat change an upgrade makes.
pub fn apply(id: UpgradeId, stats: &PlayerStats) -> PlayerStats {
    use UpgradeId::*;
    let mut next = stats.clone();
    match id {
        Damage => next.bullet_damage *= 1.05,
        MoveSpeed => next.speed *= 1.05,
        FireRate => {
            next.passive_rate = scale_rate(next.passive_rate, 0.95, 8);
            next.manual_rate = scale_rate(next.manual_rate, 0.95, 5);
        }
        MaxHealth => next.max_health += 10.0,
        AuraRange => next.aura_radius *= 1.1,
        Pierce => next.pierce += 1,
        ProjectileSpeed => next.projectile_speed *= 1.15,
        AutoFire => next.passive_rate = scale_rate(next.passive_rate, 0.8, 5),
        Knockback => next.knockback += 3.0,
        BulletSize => next.bullet_size *= 1.25,
        Explode => next.explode = true,
        Multishot => next.multishot = 2,
        OrbitingShield => next.orbiting_shield = true,
        LifeSteal => next.life_steal = true,
        Magnet => next.magnet_range *= 1.5,
        ChainLightning => next.chain_lightning = true,
        CriticalStrike => next.critical_strike = true,
        SecondWind => next.level_up_invuln = true,
        TimeFreeze => next.time_stop = true,
    }
    next
}

/// Apply an upgrade to a live player, including Vitality's small heal.
pub fn apply_to_player(id: UpgradeId, player: &mut PlayerState) {
    player.stats = apply(id, &player.stats);
    if id == UpgradeId::MaxHealth {
        player.heal(VITALITY_HEAL);
    }
    player.health = player.health.min(player.stats.max_health);
}

fn scale_rate(rate: u32, factor: f32, floor: u32) -> u32 {
    ((rate as f32 * factor).floor() as u32).max(floor)
}

/// Roll one rarity. Late waves shift weight toward common.
pub fn roll_rarity<R: Rng + ?Sized>(rng: &mut R, allow_legendary: bool, late_waves: bool) -> Rarity {
    let roll: f32 = rng.gen_range(0.0..100.0);
    let (epic_below, rare_below) = if late_waves { (12.0, 35.0) } else { (18.0, 43.0) };

    if allow_legendary && roll < 3.0 {
        Rarity::Legendary
    } else if roll < epic_below {
        Rarity::Epic
    } else if roll < rare_below {
        Rarity::Rare
    } else {
        Rarity::Common
    }
}

/// Draw the level-up menu. Pools may repeat across slots; three epic-or-better
/// cards are never offered together.
pub fn draw_offers<R: Rng + ?Sized>(rng: &mut R, level: u32, wave: u32) -> Vec<UpgradeOffer> {
    let allow_legendary = level >= LEGENDARY_MIN_LEVEL;
    let late_waves = wave > RARITY_SHIFT_AFTER_WAVE;

    let mut rarities: Vec<Rarity> = Vec::with_capacity(UPGRADE_OFFER_COUNT);
    let mut offers = Vec::with_capacity(UPGRADE_OFFER_COUNT);
    for slot in 0..UPGRADE_OFFER_COUNT {
        let mut rarity = roll_rarity(rng, allow_legendary, late_waves);
        if slot == 2 && rarities.iter().all(|r| r.is_epic_or_better()) {
            rarity = if rng.gen_bool(FORCED_COMMON_CHANCE) {
                Rarity::Common
            } else {
                Rarity::Rare
            };
        }
        let choices = pool(rarity);
        let id = choices[rng.gen_range(0..choices.len())];
        rarities.push(rarity);
        offers.push(offer(id));
    }
    offers
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn test_pools_match_rarity() {
        for rarity in [Rarity::Common, Rarity::Rare, Rarity::Epic, Rarity::Legendary] {
            for &id in pool(rarity) {
                assert_eq!(rarity_of(id), rarity, "{id:?}");
            }
        }
    }

    #[test]
    fn test_fire_rate_floors() {
        let mut stats = PlayerStats::default();
        stats = apply(UpgradeId::FireRate, &stats);
        assert_eq!(stats.passive_rate, 23);
        assert_eq!(stats.manual_rate, 11);
        for _ in 0..100 {
            stats = apply(UpgradeId::FireRate, &stats);
        }
        assert_eq!(stats.passive_rate, 8);
        assert_eq!(stats.manual_rate, 5);

        let fast = apply(UpgradeId::AutoFire, &PlayerStats::default());
        assert_eq!(fast.passive_rate, 20);
    }

    #[test]
    fn test_apply_is_pure() {
        let stats = PlayerStats::default();
        let next = apply(UpgradeId::Magnet, &stats);
        assert_eq!(stats.magnet_range, MAGNET_RANGE);
        assert_eq!(next.magnet_range, MAGNET_RANGE * 1.5);
        let flagged = apply(UpgradeId::TimeFreeze, &next);
        assert!(flagged.time_stop);
        assert!(!next.time_stop);
    }

    #[test]
    fn test_vitality_heals_capped() {
        let mut player = PlayerState::new(Default::default(), PlayerStats::default());
        apply_to_player(UpgradeId::MaxHealth, &mut player);
        assert_eq!(player.stats.max_health, 110.0);
        assert_eq!(player.health, 105.0);

        player.health = 40.0;
        apply_to_player(UpgradeId::MaxHealth, &mut player);
        assert_eq!(player.health, 45.0);
    }

    #[test]
    fn test_no_legendary_before_level_four() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..10_000 {
            let offers = draw_offers(&mut rng, 1, 1);
            assert_eq!(offers.len(), UPGRADE_OFFER_COUNT);
            assert!(offers.iter().all(|o| o.rarity != Rarity::Legendary));
        }
    }

    #[test]
    fn test_never_three_epic_or_better() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut legendary_seen = false;
        for _ in 0..10_000 {
            let offers = draw_offers(&mut rng, 10, 3);
            let epic_plus = offers.iter().filter(|o| o.rarity.is_epic_or_better()).count();
            assert!(epic_plus < 3);
            legendary_seen |= offers.iter().any(|o| o.rarity == Rarity::Legendary);
        }
        assert!(legendary_seen);
    }

    #[test]
    fn test_late_waves_favor_common() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let count = |rng: &mut ChaCha8Rng, late: bool| {
            (0..20_000)
                .filter(|_| roll_rarity(rng, false, late) == Rarity::Common)
                .count()
        };
        let early = count(&mut rng, false);
        let late = count(&mut rng, true);
        assert!(late > early, "late {late} early {early}");
    }
}
