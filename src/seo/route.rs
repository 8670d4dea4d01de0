//! Maps a request path onto the logical page it renders.
//!
//! Rules live in an ordered table and the first match wins, so more specific
//! patterns must come first: `/blog/{slug}` precedes `/blog`.

/// Pages with fixed SEO copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticPage {
    CaseStudies,
    VsBuffer,
    VsPlannable,
    VsSproutSocial,
    VsHypefury,
    Pricing,
    Features,
}

impl StaticPage {
    pub const ALL: [StaticPage; 7] = [
        StaticPage::CaseStudies,
        StaticPage::VsBuffer,
        StaticPage::VsPlannable,
        StaticPage::VsSproutSocial,
        StaticPage::VsHypefury,
        StaticPage::Pricing,
        StaticPage::Features,
    ];

    /// Canonical path of the page.
    pub const fn path(self) -> &'static str {
        match self {
            StaticPage::CaseStudies => "/case-studies",
            StaticPage::VsBuffer => "/vs-buffer",
            StaticPage::VsPlannable => "/vs-plannable",
            StaticPage::VsSproutSocial => "/vs-sproutsocial",
            StaticPage::VsHypefury => "/vs-hypefury",
            StaticPage::Pricing => "/pricing",
            StaticPage::Features => "/features",
        }
    }
}

/// The classified page for a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRoute {
    /// A single blog post, identified by slug.
    BlogPost { slug: String },
    /// The blog listing.
    BlogIndex,
    Static(StaticPage),
    /// Landing page and every path nothing else claims.
    Home,
}

enum Pattern {
    /// `{prefix}{segment}`: captures the first non-empty segment after the prefix.
    Capture(&'static str),
    /// The path itself, with or without a trailing slash, or anything below it.
    Section(&'static str),
}

impl Pattern {
    fn matches<'p>(&self, path: &'p str) -> Option<Option<&'p str>> {
        match self {
            Pattern::Capture(prefix) => {
                let rest = path.strip_prefix(prefix)?;
                let segment = rest.split('/').next().unwrap_or_default();
                (!segment.is_empty()).then_some(Some(segment))
            }
            Pattern::Section(section) => {
                let rest = path.strip_prefix(section)?;
                (rest.is_empty() || rest.starts_with('/')).then_some(None)
            }
        }
    }
}

enum Target {
    BlogPost,
    BlogIndex,
    Static(StaticPage),
}

const ROUTE_TABLE: &[(Pattern, Target)] = &[
    (Pattern::Capture("/blog/"), Target::BlogPost),
    (Pattern::Section("/blog"), Target::BlogIndex),
    (
        Pattern::Section(StaticPage::CaseStudies.path()),
        Target::Static(StaticPage::CaseStudies),
    ),
    (
        Pattern::Section(StaticPage::VsBuffer.path()),
        Target::Static(StaticPage::VsBuffer),
    ),
    (
        Pattern::Section(StaticPage::VsPlannable.path()),
        Target::Static(StaticPage::VsPlannable),
    ),
    (
        Pattern::Section(StaticPage::VsSproutSocial.path()),
        Target::Static(StaticPage::VsSproutSocial),
    ),
    (
        Pattern::Section(StaticPage::VsHypefury.path()),
        Target::Static(StaticPage::VsHypefury),
    ),
    (
        Pattern::Section(StaticPage::Pricing.path()),
        Target::Static(StaticPage::Pricing),
    ),
    (
        Pattern::Section(StaticPage::Features.path()),
        Target::Static(StaticPage::Features),
    ),
];

/// Classify a request path (query string and fragment are ignored).
///
/// Never fails: anything unrecognized is [`PageRoute::Home`].
pub fn classify(path: &str) -> PageRoute {
    let path = strip_query(path);

    for (pattern, target) in ROUTE_TABLE {
        let Some(captured) = pattern.matches(path) else {
            continue;
        };
        return match (target, captured) {
            (Target::BlogPost, Some(slug)) => PageRoute::BlogPost {
                slug: slug.to_string(),
            },
            (Target::BlogPost, None) | (Target::BlogIndex, _) => PageRoute::BlogIndex,
            (Target::Static(page), _) => PageRoute::Static(*page),
        };
    }

    PageRoute::Home
}

fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str) -> PageRoute {
        PageRoute::BlogPost { slug: slug.into() }
    }

    #[test]
    fn blog_detail_wins_over_index() {
        assert_eq!(classify("/blog/my-test-post"), post("my-test-post"));
        assert_eq!(classify("/blog/my-test-post/"), post("my-test-post"));
        assert_eq!(classify("/blog/my-test-post/comments"), post("my-test-post"));
    }

    #[test]
    fn blog_index_variants() {
        assert_eq!(classify("/blog"), PageRoute::BlogIndex);
        assert_eq!(classify("/blog/"), PageRoute::BlogIndex);
        assert_eq!(classify("/blog?category=AI"), PageRoute::BlogIndex);
    }

    #[test]
    fn query_and_fragment_are_not_part_of_the_slug() {
        assert_eq!(classify("/blog/launch?utm_source=x"), post("launch"));
        assert_eq!(classify("/blog/launch#intro"), post("launch"));
    }

    #[test]
    fn every_static_page_is_reachable_by_its_path() {
        for page in StaticPage::ALL {
            assert_eq!(classify(page.path()), PageRoute::Static(page));
            assert_eq!(
                classify(&format!("{}/", page.path())),
                PageRoute::Static(page)
            );
        }
        assert_eq!(
            classify("/case-studies/acme"),
            PageRoute::Static(StaticPage::CaseStudies)
        );
    }

    #[test]
    fn unknown_paths_fall_back_to_home() {
        for path in ["/", "", "/admin", "/trial-requests", "/blogger", "/pricing-old"] {
            assert_eq!(classify(path), PageRoute::Home, "path {path:?}");
        }
    }
}
