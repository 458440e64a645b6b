//! Built-in interest → anchor course mapping for the two elective domains.

use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
pub enum Domain {
    Humanistic,
    #[strum(serialize = "specialized", to_string = "specialization")]
    Specialization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
pub enum Interest {
    Humanities,
    SocialSciences,
    Accounting,
    Finance,
    Marketing,
    Management,
    GeneralBusiness,
}

impl Domain {
    pub fn ratings_file(self) -> &'static str {
        match self {
            Domain::Humanistic => "Humanistic Courses Ratings.csv",
            Domain::Specialization => "Specialization Courses Ratings.csv",
        }
    }

    pub fn catalog_file(self) -> &'static str {
        match self {
            Domain::Humanistic => "Humanistic Courses.csv",
            Domain::Specialization => "Specialization Courses.csv",
        }
    }

    /// Number of recommendations shown for this domain.
    pub fn default_count(self) -> usize {
        match self {
            Domain::Humanistic => 4,
            Domain::Specialization => 7,
        }
    }

    pub fn interests(self) -> &'static [Interest] {
        match self {
            Domain::Humanistic => &[Interest::Humanities, Interest::SocialSciences],
            Domain::Specialization => &[
                Interest::Accounting,
                Interest::Finance,
                Interest::Marketing,
                Interest::Management,
                Interest::GeneralBusiness,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub domain: Domain,
    pub interest: Interest,
    pub anchor: &'static str,
    pub count: usize,
}

/// Looks up the anchor course for an interest; `None` if the interest is not offered in `domain`.
pub fn preset(domain: Domain, interest: Interest) -> Option<Preset> {
    let anchor = match (domain, interest) {
        (Domain::Humanistic, Interest::Humanities) => "Chinese Contemporary and modern literature",
        (Domain::Humanistic, Interest::SocialSciences) => "Public Communication and Critical Thinking",
        (Domain::Specialization, Interest::Accounting) => "International Investment Analysis",
        (Domain::Specialization, Interest::Finance) => "International Finance",
        (Domain::Specialization, Interest::Marketing) => "Consumer Behavior",
        (Domain::Specialization, Interest::Management) => "Brand Management",
        (Domain::Specialization, Interest::GeneralBusiness) => "International Business",
        _ => return None,
    };
    Some(Preset {
        domain,
        interest,
        anchor,
        count: domain.default_count(),
    })
}
