//! Desempenho (per-student attention level) scoring
//!
//! Teachers tag each student with one or more attention levels per lesson.
//! The student page averages those tags into a single score per lesson and
//! plots the scores over time.

use crate::models::{Aula, PerformanceRecord};
use crate::time::format_short_date;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Attention level recorded for a student in a lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTag {
    Disperso,
    Razoavel,
    Atento,
    Focado,
}

impl PerformanceTag {
    /// All tags in display order
    pub const ALL: [PerformanceTag; 4] = [
        PerformanceTag::Disperso,
        PerformanceTag::Razoavel,
        PerformanceTag::Atento,
        PerformanceTag::Focado,
    ];

    /// Numeric score used by the chart (1 = disperso .. 4 = focado)
    pub fn score(self) -> u8 {
        match self {
            PerformanceTag::Disperso => 1,
            PerformanceTag::Razoavel => 2,
            PerformanceTag::Atento => 3,
            PerformanceTag::Focado => 4,
        }
    }

    /// Wire value
    pub fn as_str(self) -> &'static str {
        match self {
            PerformanceTag::Disperso => "disperso",
            PerformanceTag::Razoavel => "razoavel",
            PerformanceTag::Atento => "atento",
            PerformanceTag::Focado => "focado",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PerformanceTag::Disperso => "Disperso",
            PerformanceTag::Razoavel => "Razoável",
            PerformanceTag::Atento => "Atento",
            PerformanceTag::Focado => "Focado",
        }
    }
}

impl fmt::Display for PerformanceTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PerformanceTag {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "disperso" => Ok(PerformanceTag::Disperso),
            "razoavel" | "razoável" => Ok(PerformanceTag::Razoavel),
            "atento" => Ok(PerformanceTag::Atento),
            "focado" => Ok(PerformanceTag::Focado),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown desempenho value: {}",
                other
            ))),
        }
    }
}

/// How useful the accepted material was for the lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialUsefulness {
    MuitoUtil,
    Util,
    PoucoUtil,
}

impl MaterialUsefulness {
    pub const ALL: [MaterialUsefulness; 3] = [
        MaterialUsefulness::MuitoUtil,
        MaterialUsefulness::Util,
        MaterialUsefulness::PoucoUtil,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MaterialUsefulness::MuitoUtil => "muito_util",
            MaterialUsefulness::Util => "util",
            MaterialUsefulness::PoucoUtil => "pouco_util",
        }
    }

    /// Label used in the performance dialog
    pub fn label(self) -> &'static str {
        match self {
            MaterialUsefulness::MuitoUtil => "Muito útil",
            MaterialUsefulness::Util => "Útil",
            MaterialUsefulness::PoucoUtil => "Pouco útil",
        }
    }

    /// Label used on the student page history
    pub fn history_label(self) -> &'static str {
        match self {
            MaterialUsefulness::MuitoUtil => "material muito bom",
            MaterialUsefulness::Util => "material regular",
            MaterialUsefulness::PoucoUtil => "material ruim",
        }
    }
}

impl fmt::Display for MaterialUsefulness {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MaterialUsefulness {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "muito_util" => Ok(MaterialUsefulness::MuitoUtil),
            "util" => Ok(MaterialUsefulness::Util),
            "pouco_util" => Ok(MaterialUsefulness::PoucoUtil),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown material_util value: {}",
                other
            ))),
        }
    }
}

/// Average score of a set of tags, `None` when no tag was recorded
pub fn average_score(tags: &[PerformanceTag]) -> Option<f64> {
    if tags.is_empty() {
        return None;
    }
    let sum: u32 = tags.iter().map(|t| u32::from(t.score())).sum();
    Some(f64::from(sum) / tags.len() as f64)
}

/// Add the tag when absent, remove it when present
pub fn toggle_tag(tags: &mut Vec<PerformanceTag>, tag: PerformanceTag) {
    if let Some(pos) = tags.iter().position(|t| *t == tag) {
        tags.remove(pos);
    } else {
        tags.push(tag);
    }
}

/// Drop repeated tags, keeping the first occurrence
pub fn dedup_tags(tags: impl IntoIterator<Item = PerformanceTag>) -> Vec<PerformanceTag> {
    let mut out = Vec::new();
    for tag in tags {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// One point of the student's performance chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub aula_id: String,
    /// X-axis label (short date)
    pub label: String,
    pub value: f64,
    pub desempenho: Vec<PerformanceTag>,
}

/// Build the chart series for one student.
///
/// Lessons keep their input order; lessons without a record for the student,
/// or with an empty tag list, are excluded.
pub fn chart_series(
    lessons: &[Aula],
    student_id: &str,
    records: &HashMap<String, PerformanceRecord>,
) -> Vec<ChartPoint> {
    lessons
        .iter()
        .filter_map(|aula| {
            let tags = records.get(&aula.id)?.tags_for(student_id);
            let value = average_score(tags)?;
            Some(ChartPoint {
                aula_id: aula.id.clone(),
                label: format_short_date(&aula.data),
                value,
                desempenho: tags.to_vec(),
            })
        })
        .collect()
}

/// Count how often each tag was given to the student across records.
///
/// All four tags are always present in the result.
pub fn tag_counts<'a>(
    student_id: &str,
    records: impl IntoIterator<Item = &'a PerformanceRecord>,
) -> Vec<(PerformanceTag, usize)> {
    let mut counts: Vec<(PerformanceTag, usize)> =
        PerformanceTag::ALL.iter().map(|t| (*t, 0)).collect();
    for record in records {
        for tag in record.tags_for(student_id) {
            if let Some(entry) = counts.iter_mut().find(|(t, _)| t == tag) {
                entry.1 += 1;
            }
        }
    }
    counts
}
