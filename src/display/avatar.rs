/// Background/foreground pair used for initials avatars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarColors {
    pub background: &'static str,
    pub foreground: &'static str,
}

pub const AVATAR_PALETTE: [AvatarColors; 7] = [
    AvatarColors {
        background: "#DBEAFE",
        foreground: "#1E40AF",
    },
    AvatarColors {
        background: "#DCFCE7",
        foreground: "#166534",
    },
    AvatarColors {
        background: "#FEF9C3",
        foreground: "#854D0E",
    },
    AvatarColors {
        background: "#FCE7F3",
        foreground: "#9D174D",
    },
    AvatarColors {
        background: "#EDE9FE",
        foreground: "#5B21B6",
    },
    AvatarColors {
        background: "#FFEDD5",
        foreground: "#9A3412",
    },
    AvatarColors {
        background: "#CCFBF1",
        foreground: "#115E59",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarKey<'a> {
    Id(u64),
    Name(&'a str),
}

impl<'a> AvatarKey<'a> {
    /// Numeric input is used as an id, anything else is hashed as a name.
    pub fn parse(raw: &'a str) -> Self {
        raw.trim()
            .parse::<u64>()
            .map(AvatarKey::Id)
            .unwrap_or(AvatarKey::Name(raw))
    }
}

/// Colours collide by design: there are only seven pairs.
pub fn avatar_colors(key: AvatarKey<'_>) -> AvatarColors {
    let slot = match key {
        AvatarKey::Id(id) => id % AVATAR_PALETTE.len() as u64,
        AvatarKey::Name(name) => u64::from(string_hash(name)) % AVATAR_PALETTE.len() as u64,
    };
    AVATAR_PALETTE[slot as usize]
}

fn string_hash(value: &str) -> u32 {
    value
        .bytes()
        .fold(0u32, |hash, byte| hash.wrapping_mul(31).wrapping_add(u32::from(byte)))
}

/// Up to two uppercase initials, "?" for blank names.
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_index_modulo_palette() {
        assert_eq!(avatar_colors(AvatarKey::Id(0)), AVATAR_PALETTE[0]);
        assert_eq!(avatar_colors(AvatarKey::Id(9)), AVATAR_PALETTE[2]);
        assert_eq!(avatar_colors(AvatarKey::Id(7)), avatar_colors(AvatarKey::Id(14)));
    }

    #[test]
    fn names_hash_deterministically() {
        // "ab" = 97 * 31 + 98 = 3105, 3105 % 7 = 4
        assert_eq!(avatar_colors(AvatarKey::Name("ab")), AVATAR_PALETTE[4]);
        assert_eq!(
            avatar_colors(AvatarKey::Name("Dr. Rivera")),
            avatar_colors(AvatarKey::Name("Dr. Rivera"))
        );
    }

    #[test]
    fn parse_prefers_ids() {
        assert_eq!(AvatarKey::parse("42"), AvatarKey::Id(42));
        assert_eq!(AvatarKey::parse("Ada"), AvatarKey::Name("Ada"));
    }

    #[test]
    fn initials_take_first_two_words() {
        assert_eq!(initials("ada king lovelace"), "AK");
        assert_eq!(initials("  "), "?");
    }
}
