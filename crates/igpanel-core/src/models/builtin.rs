//! Built-in reference guides shipped with the app.
//!
//! Rows are `(lower_months, upper_months, low, high)`. Neighbouring bands share their
//! boundary month; the earlier row wins at that month.

use super::{AgeBand, GuideRanges, RangeTable, TestCode};

pub const GUIDE_CILV: &str = "Guide Cilv";
pub const GUIDE_AP: &str = "Guide Ap";

type Row = (u32, u32, f64, f64);

const IGG: &[Row] = &[
    (0, 1, 700.0, 1300.0),
    (1, 4, 280.0, 750.0),
    (4, 7, 200.0, 1200.0),
    (7, 13, 300.0, 1500.0),
    (13, 36, 400.0, 1300.0),
    (36, 72, 600.0, 1500.0),
    (72, 1200, 639.0, 1344.0),
];

const IGA: &[Row] = &[
    (0, 1, 0.0, 11.0),
    (1, 4, 6.0, 50.0),
    (4, 7, 8.0, 90.0),
    (7, 13, 16.0, 100.0),
    (13, 36, 20.0, 230.0),
    (36, 72, 50.0, 150.0),
    (72, 1200, 70.0, 312.0),
];

const IGM: &[Row] = IGG;

const IGG1: &[Row] = &[
    (0, 3, 700.0, 1300.0),
    (3, 6, 280.0, 750.0),
    (6, 9, 200.0, 1200.0),
    (9, 24, 300.0, 1500.0),
    (24, 48, 400.0, 1300.0),
    (48, 72, 600.0, 1500.0),
    (72, 96, 639.0, 1344.0),
    (96, 120, 639.0, 1344.0),
    (120, 168, 639.0, 1344.0),
    (168, 1200, 422.0, 1292.0),
];

const IGG2: &[Row] = &[
    (0, 3, 40.0, 167.0),
    (3, 6, 23.0, 147.0),
    (6, 9, 37.0, 60.0),
    (9, 24, 30.0, 327.0),
    (24, 48, 70.0, 443.0),
    (48, 72, 113.0, 480.0),
    (72, 96, 163.0, 513.0),
    (96, 120, 147.0, 493.0),
    (120, 168, 140.0, 440.0),
    (168, 1200, 117.0, 747.0),
];

const IGG3: &[Row] = &[
    (0, 3, 4.0, 23.0),
    (3, 6, 4.0, 100.0),
    (6, 9, 12.0, 62.0),
    (9, 24, 13.0, 82.0),
    (24, 48, 17.0, 90.0),
    (48, 72, 8.0, 111.0),
    (72, 96, 15.0, 113.0),
    (96, 120, 12.0, 179.0),
    (120, 168, 23.0, 117.0),
    (168, 1200, 41.0, 129.0),
];

const IGG4: &[Row] = &[
    (0, 3, 1.0, 120.0),
    (3, 6, 1.0, 120.0),
    (6, 9, 1.0, 120.0),
    (9, 24, 1.0, 120.0),
    (24, 48, 1.0, 120.0),
    (48, 72, 2.0, 138.0),
    (72, 96, 1.0, 95.0),
    (96, 120, 1.0, 153.0),
    (120, 168, 1.0, 143.0),
    (168, 1200, 10.0, 67.0),
];

const ISOHEMAGGLUTININ: &[Row] = &[
    (0, 1, 10.0, 20.0),
    (1, 4, 15.0, 30.0),
    (4, 7, 15.0, 35.0),
    (7, 13, 20.0, 45.0),
    (13, 36, 25.0, 50.0),
    (36, 72, 30.0, 55.0),
    (72, 1200, 35.0, 60.0),
];

const PRP: &[Row] = &[
    (0, 1, 5.0, 15.0),
    (1, 4, 10.0, 25.0),
    (4, 7, 15.0, 35.0),
    (7, 13, 20.0, 50.0),
    (13, 36, 25.0, 55.0),
    (36, 72, 30.0, 60.0),
    (72, 1200, 35.0, 65.0),
];

const PNEUMOCOCCUS: &[Row] = &[
    (0, 1, 5.0, 15.0),
    (1, 4, 10.0, 25.0),
    (4, 7, 15.0, 35.0),
    (7, 13, 20.0, 50.0),
    (13, 36, 25.0, 60.0),
    (36, 72, 30.0, 70.0),
    (72, 1200, 35.0, 75.0),
];

const TETANUS_TOXOID: &[Row] = &[
    (0, 1, 5.0, 15.0),
    (1, 4, 10.0, 25.0),
    (4, 7, 15.0, 35.0),
    (7, 13, 20.0, 45.0),
    (13, 36, 25.0, 55.0),
    (36, 72, 30.0, 60.0),
    (72, 1200, 35.0, 65.0),
];

fn bands(rows: &[Row]) -> Vec<AgeBand> {
    rows.iter()
        .map(|&(lower_months, upper_months, low, high)| AgeBand {
            lower_months,
            upper_months,
            low,
            high,
        })
        .collect()
}

fn guide(entries: &[(TestCode, &[Row])]) -> GuideRanges {
    entries
        .iter()
        .map(|(code, rows)| (*code, bands(rows)))
        .collect()
}

impl RangeTable {
    /// The two guides the app ships with.
    pub fn builtin() -> Self {
        let mut guides = std::collections::BTreeMap::new();
        guides.insert(
            GUIDE_CILV.to_string(),
            guide(&[
                (TestCode::Igg, IGG),
                (TestCode::Iga, IGA),
                (TestCode::Igm, IGM),
                (TestCode::Igg1, IGG1),
                (TestCode::Igg2, IGG2),
                (TestCode::Igg3, IGG3),
                (TestCode::Igg4, IGG4),
                (TestCode::AntiA, ISOHEMAGGLUTININ),
                (TestCode::AntiB, ISOHEMAGGLUTININ),
                (TestCode::Prp, PRP),
                (TestCode::Pneumococcus, PNEUMOCOCCUS),
                (TestCode::TetanusToxoid, TETANUS_TOXOID),
            ]),
        );
        guides.insert(
            GUIDE_AP.to_string(),
            guide(&[
                (TestCode::Igg1, IGG1),
                (TestCode::Igg2, IGG2),
                (TestCode::Igg3, IGG3),
                (TestCode::Igg4, IGG4),
            ]),
        );
        Self::from_guides(guides)
    }
}
