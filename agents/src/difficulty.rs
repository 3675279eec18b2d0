use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Named search presets.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Search depth in plies.
    pub const fn depth(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 3,
            Difficulty::Hard => 5,
        }
    }

    /// Cosmetic pause before the engine answers in interactive play.
    pub const fn thinking_time(self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(500),
            Difficulty::Medium => Duration::from_millis(1000),
            Difficulty::Hard => Duration::from_millis(2000),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_table() {
        assert_eq!(Difficulty::Easy.depth(), 1);
        assert_eq!(Difficulty::Medium.depth(), 3);
        assert_eq!(Difficulty::Hard.depth(), 5);

        assert_eq!(Difficulty::Easy.thinking_time(), Duration::from_millis(500));
        assert_eq!(Difficulty::Hard.thinking_time(), Duration::from_secs(2));
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn test_parse_round_trip() {
        for difficulty in Difficulty::ALL {
            assert_eq!(difficulty.to_string().parse(), Ok(difficulty));
        }
        assert_eq!("HARD".parse(), Ok(Difficulty::Hard));
        assert!("expert".parse::<Difficulty>().is_err());
    }
}
