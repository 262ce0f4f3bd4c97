use serde::Serialize;

use crate::entry::entities::{EntryId, LogEntry, Mood};

/// Levels at or above this count as high on either axis.
const HIGH_LEVEL: u8 = 3;

/// Position of an entry on the energy/meaning plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixPoint {
    pub id: EntryId,
    pub title: String,
    /// Energy level.
    pub x: u8,
    /// Meaning level.
    pub y: u8,
    pub mood: Mood,
    pub date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    HighEnergyHighMeaning,
    HighEnergyLowMeaning,
    LowEnergyHighMeaning,
    LowEnergyLowMeaning,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::HighEnergyHighMeaning,
        Quadrant::HighEnergyLowMeaning,
        Quadrant::LowEnergyHighMeaning,
        Quadrant::LowEnergyLowMeaning,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Quadrant::HighEnergyHighMeaning => "High Energy, High Meaning",
            Quadrant::HighEnergyLowMeaning => "High Energy, Low Meaning",
            Quadrant::LowEnergyHighMeaning => "Low Energy, High Meaning",
            Quadrant::LowEnergyLowMeaning => "Low Energy, Low Meaning",
        }
    }
}

impl MatrixPoint {
    pub fn quadrant(&self) -> Quadrant {
        match (self.x >= HIGH_LEVEL, self.y >= HIGH_LEVEL) {
            (true, true) => Quadrant::HighEnergyHighMeaning,
            (true, false) => Quadrant::HighEnergyLowMeaning,
            (false, true) => Quadrant::LowEnergyHighMeaning,
            (false, false) => Quadrant::LowEnergyLowMeaning,
        }
    }
}

/// One point per entry, same order.
pub fn to_matrix_points(entries: &[LogEntry]) -> Vec<MatrixPoint> {
    entries
        .iter()
        .map(|v| MatrixPoint {
            id: v.id.clone(),
            title: v.title.clone(),
            x: v.energy_level,
            y: v.meaning_level,
            mood: v.mood,
            date: v.date.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::entry::entities::{test_entries::entry, Mood};

    use super::{to_matrix_points, Quadrant};

    #[test]
    fn maps_one_to_one_in_order() {
        let entries = vec![
            entry("x", Mood::Happy, 5, 1, "2024-04-02"),
            entry("y", Mood::Sad, 1, 5, "broken"),
            entry("x", Mood::Happy, 5, 1, "2024-04-02"),
        ];
        let points = to_matrix_points(&entries);
        assert_eq!(points.len(), entries.len());
        for (point, entry) in points.iter().zip(&entries) {
            assert_eq!(point.id, entry.id);
            assert_eq!(point.x, entry.energy_level);
            assert_eq!(point.y, entry.meaning_level);
            assert_eq!(point.date, entry.date);
        }
    }

    #[test]
    fn serializes_plane_coordinates() {
        let entries = vec![entry("1", Mood::Tired, 2, 5, "2024-04-02")];
        let json = serde_json::to_value(&to_matrix_points(&entries)[0]).unwrap();
        assert_eq!(json["x"], 2);
        assert_eq!(json["y"], 5);
        assert!(json.get("energy").is_none());
    }

    #[test]
    fn quadrants_split_at_the_middle_level() {
        let entries = vec![
            entry("1", Mood::Happy, 3, 3, "2024-04-02"),
            entry("2", Mood::Happy, 5, 2, "2024-04-02"),
            entry("3", Mood::Happy, 2, 4, "2024-04-02"),
            entry("4", Mood::Happy, 1, 1, "2024-04-02"),
        ];
        let quadrants = to_matrix_points(&entries)
            .iter()
            .map(|v| v.quadrant())
            .collect::<Vec<_>>();
        assert_eq!(quadrants, Quadrant::ALL.to_vec());
    }
}
