//! The supported share networks and their link tables.
//!
//! Each network owns a small declarative table of link templates. A template is
//! chosen by which override fields are filled in: the first rule whose required
//! fields are all non-empty wins, and every table ends with a fallback that only
//! uses the page's own URL and title.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A social network that can appear in the share list.
///
/// Variants are declared in the fixed order used by the vertical layout, and the
/// derived `Ord` follows that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Reddit,
    Tumblr,
    StumbleUpon,
    Twitter,
    LinkedIn,
    Pinterest,
    Email,
    Facebook,
    GooglePlus,
}

/// A per-network override field that may replace a page default in a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Url,
    Title,
    Via,
    Summary,
    Source,
    ImageUrl,
    Description,
    Subject,
    Body,
}

/// One `(condition, template)` pair of a network's link table.
#[derive(Debug)]
pub struct LinkRule {
    /// Fields that must all be non-empty for this rule to apply.
    pub requires: &'static [Field],
    /// Link template with `{page_url}`, `{page_title}` and `{<field>}` placeholders.
    pub template: &'static str,
}

/// A network's link table, evaluated top to bottom.
#[derive(Debug)]
pub struct LinkRules {
    pub overrides: &'static [LinkRule],
    /// Used when no override rule applies.
    pub fallback: &'static str,
}

impl LinkRules {
    /// Picks the template for the given set of filled-in fields.
    pub fn select(&self, present: impl Fn(Field) -> bool) -> &'static str {
        self.overrides
            .iter()
            .find(|rule| rule.requires.iter().all(|field| present(*field)))
            .map_or(self.fallback, |rule| rule.template)
    }
}

const REDDIT: LinkRules = LinkRules {
    overrides: &[
        LinkRule {
            requires: &[Field::Url, Field::Title],
            template: "http://www.reddit.com/submit?url={url}&title={title}",
        },
        LinkRule {
            requires: &[Field::Url],
            template: "http://www.reddit.com/submit?url={url}&title={page_title}",
        },
        LinkRule {
            requires: &[Field::Title],
            template: "http://www.reddit.com/submit?url={page_url}&title={title}",
        },
    ],
    fallback: "http://www.reddit.com/submit?url={page_url}&title={page_title}",
};

const TUMBLR: LinkRules = LinkRules {
    overrides: &[
        LinkRule {
            requires: &[Field::Url, Field::Title],
            template: "http://www.tumblr.com/share?v=3&u={url}&t={title}",
        },
        LinkRule {
            requires: &[Field::Url],
            template: "http://www.tumblr.com/share?v=3&u={url}&t={page_title}",
        },
        LinkRule {
            requires: &[Field::Title],
            template: "http://www.tumblr.com/share?v=3&u={page_url}&t={title}",
        },
    ],
    fallback: "http://www.tumblr.com/share?v=3&u={page_url}&t={page_title}",
};

const STUMBLEUPON: LinkRules = LinkRules {
    overrides: &[
        LinkRule {
            requires: &[Field::Url, Field::Title],
            template: "http://www.stumbleupon.com/submit?url={url}&title={title}",
        },
        LinkRule {
            requires: &[Field::Url],
            template: "http://www.stumbleupon.com/submit?url={url}&title={page_title}",
        },
        LinkRule {
            requires: &[Field::Title],
            template: "http://www.stumbleupon.com/submit?url={page_url}&title={title}",
        },
    ],
    fallback: "http://www.stumbleupon.com/submit?url={page_url}&title={page_title}",
};

const TWITTER: LinkRules = LinkRules {
    overrides: &[LinkRule {
        requires: &[Field::Via],
        template: "https://twitter.com/intent/tweet?source={page_url}&text={page_title}:{page_url}&via=@{via}",
    }],
    fallback: "https://twitter.com/intent/tweet?source={page_url}&text={page_title}:{page_url}&via=",
};

const LINKEDIN: LinkRules = LinkRules {
    overrides: &[
        LinkRule {
            requires: &[Field::Summary, Field::Source],
            template: "https://www.linkedin.com/shareArticle?mini=true&url={page_url}&title={page_title}&source={source}&summary={summary}",
        },
        LinkRule {
            requires: &[Field::Source],
            template: "https://www.linkedin.com/shareArticle?mini=true&url={page_url}&title={page_title}&source={source}&summary=",
        },
        LinkRule {
            requires: &[Field::Summary],
            template: "https://www.linkedin.com/shareArticle?mini=true&url={page_url}&title={page_title}&source=&summary={summary}",
        },
    ],
    fallback: "https://www.linkedin.com/shareArticle?mini=true&url={page_url}&title={page_title}&source=&summary=",
};

const PINTEREST: LinkRules = LinkRules {
    overrides: &[
        LinkRule {
            requires: &[Field::ImageUrl, Field::Description],
            template: "https://pinterest.com/pin/create/button/?url={page_url}&media={image_url}&description={description}",
        },
        LinkRule {
            requires: &[Field::ImageUrl],
            template: "https://pinterest.com/pin/create/button/?url={page_url}&media={image_url}&description=",
        },
        LinkRule {
            requires: &[Field::Description],
            template: "https://pinterest.com/pin/create/button/?url={page_url}&media=&description={description}",
        },
    ],
    fallback: "https://pinterest.com/pin/create/button/?url={page_url}&media=&description=",
};

const EMAIL: LinkRules = LinkRules {
    overrides: &[
        LinkRule {
            requires: &[Field::Body, Field::Subject],
            template: "mailto:?&subject={subject}&body={body} {page_url}",
        },
        LinkRule {
            requires: &[Field::Body],
            template: "mailto:?&subject=&body={body} {page_url}",
        },
        LinkRule {
            requires: &[Field::Subject],
            template: "mailto:?&subject={subject}&body={page_url}",
        },
    ],
    fallback: "mailto:?&subject=&body={page_url}",
};

const FACEBOOK: LinkRules = LinkRules {
    overrides: &[],
    fallback: "https://www.facebook.com/sharer/sharer.php?u={page_url}&t={page_title}",
};

const GOOGLEPLUS: LinkRules = LinkRules {
    overrides: &[],
    fallback: "https://plus.google.com/share?url={page_url}",
};

impl Network {
    /// All networks in declaration order.
    pub const ALL: [Network; 9] = [
        Network::Reddit,
        Network::Tumblr,
        Network::StumbleUpon,
        Network::Twitter,
        Network::LinkedIn,
        Network::Pinterest,
        Network::Email,
        Network::Facebook,
        Network::GooglePlus,
    ];

    /// Configuration key of the network.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Network::Reddit => "reddit",
            Network::Tumblr => "tumblr",
            Network::StumbleUpon => "stumbleupon",
            Network::Twitter => "twitter",
            Network::LinkedIn => "linkedin",
            Network::Pinterest => "pinterest",
            Network::Email => "email",
            Network::Facebook => "facebook",
            Network::GooglePlus => "googleplus",
        }
    }

    /// Human readable name used in the settings page.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Network::Reddit => "Reddit",
            Network::Tumblr => "Tumblr",
            Network::StumbleUpon => "StumbleUpon",
            Network::Twitter => "Twitter",
            Network::LinkedIn => "LinkedIn",
            Network::Pinterest => "Pinterest",
            Network::Email => "Email",
            Network::Facebook => "Facebook",
            Network::GooglePlus => "Google+",
        }
    }

    /// Order key used when the configuration does not set one.
    #[must_use]
    pub fn default_order(self) -> u8 {
        match self {
            Network::Reddit => 1,
            Network::Tumblr => 2,
            Network::StumbleUpon => 3,
            Network::Twitter => 4,
            Network::LinkedIn => 5,
            Network::Pinterest => 6,
            Network::Email => 7,
            Network::Facebook => 8,
            Network::GooglePlus => 9,
        }
    }

    /// Slug used by the icon asset bundle.
    #[must_use]
    pub fn icon_slug(self) -> &'static str {
        match self {
            Network::GooglePlus => "google",
            Network::Email => "email1",
            other => other.key(),
        }
    }

    /// The horizontal and vertical CSS classes of the anchor, space separated.
    #[must_use]
    pub fn css_classes(self) -> String {
        let slug = self.icon_slug();
        format!("soc-{slug} soc_ver-{slug}")
    }

    /// Mail links stay in the current tab, every other network opens a new one.
    #[must_use]
    pub fn opens_new_tab(self) -> bool {
        self != Network::Email
    }

    /// Override fields this network understands.
    #[must_use]
    pub fn fields(self) -> &'static [Field] {
        match self {
            Network::Reddit | Network::Tumblr | Network::StumbleUpon => &[Field::Url, Field::Title],
            Network::Twitter => &[Field::Via],
            Network::LinkedIn => &[Field::Summary, Field::Source],
            Network::Pinterest => &[Field::ImageUrl, Field::Description],
            Network::Email => &[Field::Subject, Field::Body],
            Network::Facebook | Network::GooglePlus => &[],
        }
    }

    /// The link table of this network.
    #[must_use]
    pub fn rules(self) -> &'static LinkRules {
        match self {
            Network::Reddit => &REDDIT,
            Network::Tumblr => &TUMBLR,
            Network::StumbleUpon => &STUMBLEUPON,
            Network::Twitter => &TWITTER,
            Network::LinkedIn => &LINKEDIN,
            Network::Pinterest => &PINTEREST,
            Network::Email => &EMAIL,
            Network::Facebook => &FACEBOOK,
            Network::GooglePlus => &GOOGLEPLUS,
        }
    }

    /// Looks a network up by its configuration key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|network| network.key() == key)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::Url,
        Field::Title,
        Field::Via,
        Field::Summary,
        Field::Source,
        Field::ImageUrl,
        Field::Description,
        Field::Subject,
        Field::Body,
    ];

    /// Configuration key and template placeholder name of the field.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Field::Url => "url",
            Field::Title => "title",
            Field::Via => "via",
            Field::Summary => "summary",
            Field::Source => "source",
            Field::ImageUrl => "image_url",
            Field::Description => "description",
            Field::Subject => "subject",
            Field::Body => "body",
        }
    }

    /// Looks a field up by its configuration key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    /// Whether the field holds a URL.
    #[must_use]
    pub fn is_url(self) -> bool {
        matches!(self, Field::Url | Field::ImageUrl)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
