// src/scouting/tendencies.rs
//
// Veto tendencies from the resolved pick/ban events of finished matches.
// Thresholds are conservative on purpose: a single regular season gives a
// team maybe a dozen vetoes, so the classifier favors few false positives
// over completeness.
use std::collections::{BTreeMap, HashSet};

use crate::models::scouting::{MapTendency, MatchReport, MatchStatus, VetoTendencies};

const PERMABAN_MIN_BANS: u32 = 3;
const PERMABAN_MIN_BAN_RATE: f64 = 0.8;
const COMFORT_MIN_EVENTS: u32 = 2;
const COMFORT_MIN_PICK_RATE: f64 = 0.6;

pub fn analyze(rows: &[MatchReport]) -> VetoTendencies {
    let mut counts: BTreeMap<String, (u32, u32)> = BTreeMap::new();
    let mut matches_tracked = 0u32;

    for row in rows {
        if row.status != MatchStatus::Finished {
            continue;
        }
        if row.picked.is_empty() && row.banned.is_empty() {
            continue;
        }
        matches_tracked += 1;

        // each map counts at most once per match per side
        for map in unique(&row.picked) {
            counts.entry(map).or_default().0 += 1;
        }
        for map in unique(&row.banned) {
            counts.entry(map).or_default().1 += 1;
        }
    }

    let mut maps: Vec<MapTendency> = counts
        .into_iter()
        .map(|(map, (picks, bans))| {
            let total = (picks + bans).max(1) as f64;
            MapTendency {
                map,
                picks,
                bans,
                pick_rate: picks as f64 / total,
                ban_rate: bans as f64 / total,
            }
        })
        .collect();

    let top_comfort_pick = maps
        .iter()
        .filter(|m| m.picks >= 1)
        .max_by(|a, b| {
            a.pick_rate
                .total_cmp(&b.pick_rate)
                .then(a.picks.cmp(&b.picks))
        })
        .cloned();

    let mut likely_comfort_picks: Vec<&MapTendency> = maps
        .iter()
        .filter(|m| {
            m.picks + m.bans >= COMFORT_MIN_EVENTS
                && m.pick_rate >= COMFORT_MIN_PICK_RATE
                && m.picks >= m.bans
        })
        .collect();
    likely_comfort_picks.sort_by(|a, b| {
        b.pick_rate
            .total_cmp(&a.pick_rate)
            .then(b.picks.cmp(&a.picks))
            .then(a.map.cmp(&b.map))
    });
    let likely_comfort_picks: Vec<String> =
        likely_comfort_picks.into_iter().map(|m| m.map.clone()).collect();

    let mut likely_permabans: Vec<String> = maps
        .iter()
        .filter(|m| {
            m.picks == 0 && m.bans >= PERMABAN_MIN_BANS && m.ban_rate >= PERMABAN_MIN_BAN_RATE
        })
        .map(|m| m.map.clone())
        .collect();
    likely_permabans.sort();

    maps.sort_by(|a, b| {
        (b.picks + b.bans)
            .cmp(&(a.picks + a.bans))
            .then(b.pick_rate.total_cmp(&a.pick_rate))
    });

    VetoTendencies {
        matches_tracked,
        maps,
        likely_permabans,
        likely_comfort_picks,
        top_comfort_pick,
    }
}

fn unique(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}
