//! Built-in form catalogs
//!
//! Three registration variants, each carrying its rule table, store
//! partition, registration-id prefix, and unique-key field. The rule tables
//! reproduce the source forms field for field, including their messages.

use serde::{Deserialize, Serialize};

use crate::rules::RuleSet;

const MAX_PHOTO_BYTES: u64 = 2 * 1024 * 1024;

/// The three registration form variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormVariant {
    CricketAuction,
    UserSignup,
    SplPlayer,
}

impl FormVariant {
    /// Record-store partition for this variant.
    pub fn partition(&self) -> &'static str {
        match self {
            FormVariant::CricketAuction => "cricketPlayers",
            FormVariant::UserSignup => "registeredUsers",
            FormVariant::SplPlayer => "splPlayers",
        }
    }

    /// Three-letter prefix for generated registration ids.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            FormVariant::CricketAuction => "CKT",
            FormVariant::UserSignup => "USR",
            FormVariant::SplPlayer => "SPL",
        }
    }

    /// The field whose canonicalized value is the duplicate-detection key.
    pub fn unique_key_field(&self) -> &'static str {
        "phone"
    }

    /// The field holding the registrant's display name.
    pub fn name_field(&self) -> &'static str {
        match self {
            FormVariant::CricketAuction | FormVariant::SplPlayer => "playerName",
            FormVariant::UserSignup => "fullName",
        }
    }

    pub fn spec(&self) -> FormSpec {
        match self {
            FormVariant::CricketAuction => FormSpec::cricket_auction(),
            FormVariant::UserSignup => FormSpec::user_signup(),
            FormVariant::SplPlayer => FormSpec::spl_player(),
        }
    }
}

/// A form variant together with its rule table.
#[derive(Debug, Clone)]
pub struct FormSpec {
    pub variant: FormVariant,
    pub rules: RuleSet,
}

impl FormSpec {
    /// Cricket auction registration.
    pub fn cricket_auction() -> Self {
        let rules = RuleSet::builder()
            .field("playerName", "Player Name", |f| {
                f.required()
                    .pattern(
                        r"^[a-zA-Z\s\.]+$",
                        "Player name must be at least 2 characters and contain only letters",
                    )
                    .min_length(
                        2,
                        "Player name must be at least 2 characters and contain only letters",
                    )
            })
            .field("phone", "Phone Number", |f| {
                f.required().pattern(
                    r"^(\+91|91)?[6-9]\d{9}$",
                    "Please enter a valid Indian mobile number (10 digits starting with 6-9)",
                )
            })
            .field("position", "Playing Position", |f| {
                f.required_with("Please select your playing position")
            })
            .field("experience", "Experience Level", |f| {
                f.required_with("Please select your cricket experience level")
            })
            .field("age", "Age", |f| {
                f.required().custom(
                    |value, _| age_in_range(value, 16, 50),
                    "Age must be between 16 and 50 years for cricket auction",
                )
            })
            .field("location", "Location", |f| {
                f.required()
                    .pattern(r"^[a-zA-Z\s,.\-]+$", "Please enter a valid city/location name")
                    .min_length(2, "Please enter a valid city/location name")
            })
            .field("terms", "Terms", |f| {
                f.required_with("You must agree to the auction terms and conditions")
            })
            .field("availability", "Availability", |f| {
                f.required_with("You must confirm your availability for the tournament")
            })
            .build()
            .expect("cricket auction rule table is statically valid");
        Self {
            variant: FormVariant::CricketAuction,
            rules,
        }
    }

    /// Generic user signup.
    pub fn user_signup() -> Self {
        let rules = RuleSet::builder()
            .field("fullName", "Full Name", |f| {
                f.required()
                    .pattern(r"^[a-zA-Z\s\.]+$", "Name must contain only letters")
                    .min_length(2, "Name must be at least 2 characters")
            })
            .field("email", "Email", |f| {
                f.required().pattern(
                    r"^[^\s@]+@[^\s@]+\.[^\s@]+$",
                    "Please enter a valid email address",
                )
            })
            .field("phone", "Phone Number", |f| {
                f.required().pattern(
                    r"^(\+91|91)?[6-9]\d{9}$",
                    "Please enter a valid Indian mobile number (10 digits starting with 6-9)",
                )
            })
            .field("password", "Password", |f| {
                f.required()
                    .min_length(8, "Password must be at least 8 characters")
            })
            .field("confirmPassword", "Confirm Password", |f| {
                f.required()
                    .min_length(8, "Password must be at least 8 characters")
                    .matches("password", "Passwords do not match")
            })
            .field("terms", "Terms", |f| {
                f.required_with("You must agree to the terms and conditions")
            })
            .build()
            .expect("user signup rule table is statically valid");
        Self {
            variant: FormVariant::UserSignup,
            rules,
        }
    }

    /// SPL player registration, with jersey number and photo attachment.
    pub fn spl_player() -> Self {
        let rules = RuleSet::builder()
            .field("playerName", "Player Name", |f| {
                f.required()
                    .pattern(
                        r"^[a-zA-Z\s\.]+$",
                        "Player name must be at least 2 characters and contain only letters",
                    )
                    .min_length(
                        2,
                        "Player name must be at least 2 characters and contain only letters",
                    )
            })
            .field("phone", "Phone Number", |f| {
                f.required().pattern(
                    r"^(\+91|91)?[6-9]\d{9}$",
                    "Please enter a valid Indian mobile number (10 digits starting with 6-9)",
                )
            })
            .field("position", "Playing Position", |f| {
                f.required_with("Please select your playing position")
            })
            .field("jerseyNumber", "Jersey Number", |f| {
                f.required().custom(
                    |value, _| {
                        value
                            .parse::<u32>()
                            .map(|n| (1..=99).contains(&n))
                            .unwrap_or(false)
                    },
                    "Jersey number must be between 1 and 99",
                )
            })
            .field("age", "Age", |f| {
                f.required().custom(
                    |value, _| age_in_range(value, 16, 50),
                    "Age must be between 16 and 50 years",
                )
            })
            .field("photo", "Photo", |f| {
                f.custom(
                    |_, handle| match handle.attachment {
                        Some(a) => {
                            matches!(a.content_type.as_str(), "image/jpeg" | "image/png")
                                && a.size_bytes <= MAX_PHOTO_BYTES
                        }
                        // A bare string value without an attachment carries no
                        // usable metadata.
                        None => false,
                    },
                    "Photo must be a JPG or PNG image under 2 MB",
                )
            })
            .field("terms", "Terms", |f| {
                f.required_with("You must agree to the league terms and conditions")
            })
            .build()
            .expect("SPL player rule table is statically valid");
        Self {
            variant: FormVariant::SplPlayer,
            rules,
        }
    }
}

fn age_in_range(value: &str, min: u32, max: u32) -> bool {
    value
        .parse::<u32>()
        .map(|age| age >= min && age <= max)
        .unwrap_or(false)
}

/// Display name for a stored playing-position code; unknown codes pass
/// through unchanged.
pub fn position_display_name(code: &str) -> &str {
    match code {
        "batsman" => "Batsman",
        "bowler" => "Bowler",
        "wicket-keeper" => "Wicket Keeper",
        "all-rounder" => "All Rounder",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Attachment, FormInput};

    #[test]
    fn cricket_age_boundaries_are_inclusive() {
        let spec = FormSpec::cricket_auction();
        for (age, expect_valid) in [("15", false), ("16", true), ("50", true), ("51", false)] {
            let input = FormInput::new().with("age", age);
            let result = spec.rules.validate_field("age", &input).unwrap();
            assert_eq!(result.valid, expect_valid, "age {age}");
            if !expect_valid {
                assert_eq!(
                    result.message.as_deref(),
                    Some("Age must be between 16 and 50 years for cricket auction")
                );
            }
        }
    }

    #[test]
    fn cricket_phone_accepts_country_code_forms() {
        let spec = FormSpec::cricket_auction();
        for phone in ["9876543210", "919876543210", "+919876543210"] {
            let input = FormInput::new().with("phone", phone);
            assert!(
                spec.rules.validate_field("phone", &input).unwrap().valid,
                "phone {phone}"
            );
        }
        for phone in ["12345", "5876543210", "98765432100"] {
            let input = FormInput::new().with("phone", phone);
            assert!(
                !spec.rules.validate_field("phone", &input).unwrap().valid,
                "phone {phone}"
            );
        }
    }

    #[test]
    fn name_pattern_is_checked_before_min_length() {
        // "7" fails both checks; the pattern message surfaces because the
        // catalogs declare pattern ahead of min-length.
        let spec = FormSpec::user_signup();
        let input = FormInput::new().with("fullName", "7");
        let result = spec.rules.validate_field("fullName", &input).unwrap();
        assert_eq!(
            result.message.as_deref(),
            Some("Name must contain only letters")
        );
    }

    #[test]
    fn signup_confirm_password_must_match() {
        let spec = FormSpec::user_signup();
        let input = FormInput::new()
            .with("password", "hunter2hunter2")
            .with("confirmPassword", "hunter2hunter3");
        let result = spec.rules.validate_field("confirmPassword", &input).unwrap();
        assert_eq!(result.message.as_deref(), Some("Passwords do not match"));
    }

    #[test]
    fn spl_photo_is_optional_but_checked_when_attached() {
        let spec = FormSpec::spl_player();

        // No photo at all: trivially valid.
        let input = FormInput::new();
        assert!(spec.rules.validate_field("photo", &input).unwrap().valid);

        // Oversized image fails.
        let mut input = FormInput::new();
        input.attach(
            "photo",
            Attachment::from_bytes("big.png", "image/png", vec![0u8; 3 * 1024 * 1024]),
        );
        let result = spec.rules.validate_field("photo", &input).unwrap();
        assert_eq!(
            result.message.as_deref(),
            Some("Photo must be a JPG or PNG image under 2 MB")
        );

        // Small JPEG passes.
        let mut input = FormInput::new();
        input.attach(
            "photo",
            Attachment::from_bytes("ok.jpg", "image/jpeg", vec![0u8; 1024]),
        );
        assert!(spec.rules.validate_field("photo", &input).unwrap().valid);
    }

    #[test]
    fn position_display_names_match_stored_codes() {
        assert_eq!(position_display_name("wicket-keeper"), "Wicket Keeper");
        assert_eq!(position_display_name("all-rounder"), "All Rounder");
        assert_eq!(position_display_name("coach"), "coach");
    }

    #[test]
    fn variant_metadata_is_consistent() {
        for variant in [
            FormVariant::CricketAuction,
            FormVariant::UserSignup,
            FormVariant::SplPlayer,
        ] {
            let spec = variant.spec();
            assert_eq!(spec.variant, variant);
            assert!(spec.rules.get(variant.unique_key_field()).is_ok());
            assert!(spec.rules.get(variant.name_field()).is_ok());
            assert_eq!(variant.id_prefix().len(), 3);
        }
    }
}
