//! Static site content compiled into the binary: service offerings,
//! health-benefit articles, FAQ, the page routing surface, and site search.

use std::sync::LazyLock;

use serde::Serialize;
use utoipa::ToSchema;

/// Maximum number of site-search hits returned.
pub const SEARCH_LIMIT: usize = 6;

/// A service the business sells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ServiceOffering {
    /// URL slug under `/services/`.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// One-paragraph description.
    pub description: String,
    /// Grouping shown on the services page.
    pub category: String,
    /// Bullet points for the detail page.
    pub highlights: Vec<String>,
}

/// A health-benefit article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HealthBenefit {
    /// URL slug under `/health-benefits/`.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Summary paragraph.
    pub description: String,
    /// Grouping label.
    pub category: String,
}

/// One FAQ entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FaqEntry {
    /// Question text.
    pub question: String,
    /// Answer text.
    pub answer: String,
}

/// What kind of page a route renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    /// Top-level marketing page.
    Marketing,
    /// Service detail page.
    Service,
    /// Health-benefit detail page.
    HealthBenefit,
    /// Published blog post.
    BlogPost,
    /// Privacy policy, terms.
    Legal,
    /// Admin console screen.
    Admin,
}

impl PageKind {
    /// Wire representation, also used as `site_content.content_type`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Marketing => "marketing",
            Self::Service => "service",
            Self::HealthBenefit => "health_benefit",
            Self::BlogPost => "blog_post",
            Self::Legal => "legal",
            Self::Admin => "admin",
        }
    }
}

/// A route of the page surface with its SEO metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageDef {
    /// Absolute path without trailing slash (`/` for home).
    pub path: String,
    /// SEO title.
    pub title: String,
    /// SEO meta description.
    pub description: String,
    /// Page kind.
    pub kind: PageKind,
    /// Whether an admin session is required.
    pub requires_admin: bool,
}

/// A site-search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SearchEntry {
    /// Entry title.
    pub title: String,
    /// Entry description.
    pub description: String,
    /// Entry category.
    pub category: String,
    /// Where the entry lives.
    pub url: String,
}

/// All static content.
#[derive(Debug)]
pub struct Catalog {
    services: Vec<ServiceOffering>,
    benefits: Vec<HealthBenefit>,
    faq: Vec<FaqEntry>,
    pages: Vec<PageDef>,
    search_index: Vec<SearchEntry>,
}

static CATALOG: LazyLock<Catalog> = LazyLock::new(Catalog::build);

/// Returns the process-wide catalog.
#[must_use]
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

const SERVICES: &[(&str, &str, &str, &str, &[&str])] = &[
    (
        "custom-sauna-builds",
        "Custom Sauna Builds",
        "Traditional Finnish saunas designed and built to fit your home, from compact closets to full wellness suites.",
        "Installation",
        &["On-site design consultation", "Nordic spruce, cedar or thermo-aspen", "Wood-burning or electric heaters"],
    ),
    (
        "outdoor-saunas",
        "Outdoor & Barrel Saunas",
        "Weather-proof barrel and cabin saunas for gardens, lakesides and cottages, delivered and installed.",
        "Installation",
        &["Foundation and electrical prep", "Panoramic glass options", "Snow-load rated roofs"],
    ),
    (
        "infrared-saunas",
        "Infrared Sauna Installation",
        "Low-temperature infrared cabins with full-spectrum emitters for gentle, deep warmth.",
        "Installation",
        &["Plug-and-play or hard-wired", "Low-EMF carbon panels", "Chromotherapy lighting"],
    ),
    (
        "steam-rooms",
        "Steam Room Installation",
        "Tiled steam rooms with commercial-grade generators, vapor barriers and aromatherapy.",
        "Installation",
        &["Sealed vapor envelope", "Sloped ceilings to stop drips", "Smart controls"],
    ),
    (
        "sauna-renovation",
        "Sauna Renovation & Repair",
        "Heater replacement, re-benching, ventilation fixes and full refurbishments of existing saunas.",
        "Maintenance",
        &["Heater diagnostics", "Bench and panel replacement", "Ventilation upgrades"],
    ),
    (
        "cold-plunge",
        "Cold Plunge Pools",
        "Chilled plunge tubs paired with your sauna for contrast therapy at home.",
        "Wellness",
        &["Chiller and filtration", "Indoor or outdoor", "Insulated covers"],
    ),
];

const BENEFITS: &[(&str, &str, &str)] = &[
    (
        "stress-relief",
        "Stress Relief",
        "Regular sauna bathing lowers cortisol and helps the nervous system switch into rest mode.",
    ),
    (
        "cardiovascular-health",
        "Cardiovascular Health",
        "Heat exposure raises heart rate much like light exercise, supporting healthy blood pressure.",
    ),
    (
        "muscle-recovery",
        "Muscle Recovery",
        "Increased circulation delivers oxygen to tired muscles and eases soreness after training.",
    ),
    (
        "better-sleep",
        "Better Sleep",
        "The drop in body temperature after a session helps you fall asleep faster and sleep deeper.",
    ),
    (
        "skin-health",
        "Skin Health",
        "Sweating opens pores and boosts circulation for clearer, healthier-looking skin.",
    ),
    (
        "immune-support",
        "Immune Support",
        "Repeated heat stress is linked to fewer common colds and a more responsive immune system.",
    ),
];

const FAQ: &[(&str, &str)] = &[
    (
        "How long does a sauna installation take?",
        "Most indoor builds take one to two weeks on site; outdoor cabins usually take three to five days once the foundation is ready.",
    ),
    (
        "Do I need a dedicated electrical circuit?",
        "Electric heaters above 6 kW need a dedicated 240 V circuit. We coordinate with a licensed electrician during planning.",
    ),
    (
        "What wood do you recommend?",
        "Nordic spruce is the classic choice; western red cedar and thermo-aspen resist moisture and stay cool to the touch.",
    ),
    (
        "Do you offer maintenance plans?",
        "Yes. Annual service covers heater inspection, stone replacement, bench treatment and ventilation checks.",
    ),
    (
        "Is infrared better than a traditional sauna?",
        "They feel different: infrared runs cooler and heats the body directly, while a traditional sauna gives hot air and löyly steam.",
    ),
];

const MARKETING_PAGES: &[(&str, &str, &str, PageKind)] = &[
    ("/", "Custom Saunas & Installation", "Handcrafted indoor and outdoor saunas, installed by certified builders.", PageKind::Marketing),
    ("/about", "About Us", "Meet the craftsman behind every build and learn how we work.", PageKind::Marketing),
    ("/services", "Our Services", "Sauna builds, infrared cabins, steam rooms, renovations and cold plunges.", PageKind::Marketing),
    ("/health-benefits", "Health Benefits of Sauna", "What regular sauna bathing does for your heart, muscles, sleep and mood.", PageKind::Marketing),
    ("/gallery", "Project Gallery", "Photos of finished indoor, outdoor and infrared sauna projects.", PageKind::Marketing),
    ("/reviews", "Customer Reviews", "What homeowners say about their new sauna.", PageKind::Marketing),
    ("/faq", "Frequently Asked Questions", "Answers about timelines, electrical needs, materials and maintenance.", PageKind::Marketing),
    ("/contact", "Contact & Free Quote", "Tell us about your space and get a free installation quote.", PageKind::Marketing),
    ("/blog", "Sauna Blog", "Guides and tips on sauna design, bathing rituals and wellness.", PageKind::Marketing),
    ("/privacy-policy", "Privacy Policy", "How we collect, use and protect your personal data.", PageKind::Legal),
    ("/terms-of-service", "Terms of Service", "The terms that apply to quotes, installations and use of this site.", PageKind::Legal),
];

const ADMIN_PAGES: &[(&str, &str)] = &[
    ("/admin", "Admin Dashboard"),
    ("/admin/contacts", "Contact Submissions"),
    ("/admin/subscribers", "Newsletter Subscribers"),
    ("/admin/gallery", "Gallery Manager"),
    ("/admin/reviews", "Review Moderation"),
    ("/admin/blog", "Blog Manager"),
    ("/admin/blog/settings", "Blog Generator Settings"),
    ("/admin/analytics", "Analytics"),
    ("/admin/profile", "Owner Profile"),
];

/// Public login screen of the admin console.
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";

impl Catalog {
    fn build() -> Self {
        let services: Vec<ServiceOffering> = SERVICES
            .iter()
            .map(|(slug, title, description, category, highlights)| ServiceOffering {
                slug: (*slug).to_string(),
                title: (*title).to_string(),
                description: (*description).to_string(),
                category: (*category).to_string(),
                highlights: highlights.iter().map(|h| (*h).to_string()).collect(),
            })
            .collect();

        let benefits: Vec<HealthBenefit> = BENEFITS
            .iter()
            .map(|(slug, title, description)| HealthBenefit {
                slug: (*slug).to_string(),
                title: (*title).to_string(),
                description: (*description).to_string(),
                category: "Health Benefits".to_string(),
            })
            .collect();

        let faq = FAQ
            .iter()
            .map(|(q, a)| FaqEntry {
                question: (*q).to_string(),
                answer: (*a).to_string(),
            })
            .collect();

        let mut pages: Vec<PageDef> = MARKETING_PAGES
            .iter()
            .map(|(path, title, description, kind)| PageDef {
                path: (*path).to_string(),
                title: (*title).to_string(),
                description: (*description).to_string(),
                kind: *kind,
                requires_admin: false,
            })
            .collect();
        pages.extend(services.iter().map(|s| PageDef {
            path: format!("/services/{}", s.slug),
            title: s.title.clone(),
            description: s.description.clone(),
            kind: PageKind::Service,
            requires_admin: false,
        }));
        pages.extend(benefits.iter().map(|b| PageDef {
            path: format!("/health-benefits/{}", b.slug),
            title: b.title.clone(),
            description: b.description.clone(),
            kind: PageKind::HealthBenefit,
            requires_admin: false,
        }));
        pages.push(PageDef {
            path: ADMIN_LOGIN_PATH.to_string(),
            title: "Admin Sign In".to_string(),
            description: "Sign in to the site console.".to_string(),
            kind: PageKind::Admin,
            requires_admin: false,
        });
        pages.extend(ADMIN_PAGES.iter().map(|(path, title)| PageDef {
            path: (*path).to_string(),
            title: (*title).to_string(),
            description: String::new(),
            kind: PageKind::Admin,
            requires_admin: true,
        }));

        let search_index = pages
            .iter()
            .filter(|p| p.kind == PageKind::Marketing && p.path != "/")
            .map(|p| SearchEntry {
                title: p.title.clone(),
                description: p.description.clone(),
                category: "Pages".to_string(),
                url: p.path.clone(),
            })
            .chain(services.iter().map(|s| SearchEntry {
                title: s.title.clone(),
                description: s.description.clone(),
                category: s.category.clone(),
                url: format!("/services/{}", s.slug),
            }))
            .chain(benefits.iter().map(|b| SearchEntry {
                title: b.title.clone(),
                description: b.description.clone(),
                category: b.category.clone(),
                url: format!("/health-benefits/{}", b.slug),
            }))
            .collect();

        Self {
            services,
            benefits,
            faq,
            pages,
            search_index,
        }
    }

    /// Service offerings in display order.
    #[must_use]
    pub fn services(&self) -> &[ServiceOffering] {
        &self.services
    }

    /// Health-benefit articles in display order.
    #[must_use]
    pub fn health_benefits(&self) -> &[HealthBenefit] {
        &self.benefits
    }

    /// FAQ entries.
    #[must_use]
    pub fn faq(&self) -> &[FaqEntry] {
        &self.faq
    }

    /// Every route of the page surface.
    #[must_use]
    pub fn pages(&self) -> &[PageDef] {
        &self.pages
    }

    /// Public, indexable pages (everything except the admin console).
    pub fn public_pages(&self) -> impl Iterator<Item = &PageDef> {
        self.pages.iter().filter(|p| p.kind != PageKind::Admin)
    }

    /// Looks up a service by slug.
    #[must_use]
    pub fn service(&self, slug: &str) -> Option<&ServiceOffering> {
        self.services.iter().find(|s| s.slug == slug)
    }

    /// Looks up a health-benefit article by slug.
    #[must_use]
    pub fn health_benefit(&self, slug: &str) -> Option<&HealthBenefit> {
        self.benefits.iter().find(|b| b.slug == slug)
    }

    /// Resolves a request path to its page, ignoring a trailing slash.
    #[must_use]
    pub fn find_page(&self, path: &str) -> Option<&PageDef> {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        self.pages.iter().find(|p| p.path == normalized)
    }

    /// Case-insensitive substring search over title, description, and
    /// category, in catalog order, capped at [`SEARCH_LIMIT`].
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<SearchEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.search_index
            .iter()
            .filter(|e| {
                e.title.to_lowercase().contains(&needle)
                    || e.description.to_lowercase().contains(&needle)
                    || e.category.to_lowercase().contains(&needle)
            })
            .take(SEARCH_LIMIT)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn search_matches_any_field_case_insensitively() {
        let hits = catalog().search("INFRARED");
        assert!(!hits.is_empty());
        for hit in &hits {
            let haystack =
                format!("{} {} {}", hit.title, hit.description, hit.category).to_lowercase();
            assert!(haystack.contains("infrared"));
        }
    }

    #[test]
    fn search_matches_category() {
        let hits = catalog().search("maintenance");
        assert!(hits.iter().any(|h| h.url == "/services/sauna-renovation"));
    }

    #[test]
    fn search_is_capped_at_six() {
        // "sauna" appears in most entries.
        let hits = catalog().search("sauna");
        assert_eq!(hits.len(), SEARCH_LIMIT);
    }

    #[test]
    fn blank_query_returns_nothing() {
        assert!(catalog().search("   ").is_empty());
    }

    #[test]
    fn detail_pages_are_derived() {
        let Some(page) = catalog().find_page("/services/cold-plunge/") else {
            panic!("cold plunge page should exist");
        };
        assert_eq!(page.kind, PageKind::Service);
        assert!(catalog().find_page("/health-benefits/better-sleep").is_some());
        assert!(catalog().find_page("/services/hot-tubs").is_none());
    }

    #[test]
    fn admin_pages_require_session_except_login() {
        let Some(login) = catalog().find_page(ADMIN_LOGIN_PATH) else {
            panic!("login page should exist");
        };
        assert!(!login.requires_admin);
        assert!(
            catalog()
                .pages()
                .iter()
                .filter(|p| p.path.starts_with("/admin") && p.path != ADMIN_LOGIN_PATH)
                .all(|p| p.requires_admin)
        );
    }

    #[test]
    fn home_resolves_from_empty_path() {
        let Some(home) = catalog().find_page("") else {
            panic!("home should resolve");
        };
        assert_eq!(home.path, "/");
    }
}
