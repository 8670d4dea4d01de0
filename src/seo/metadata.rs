//! Per-page SEO metadata.
//!
//! Blog posts get copy derived from the stored post; every other page has
//! fixed copy so its head tags never need a database round trip.

use tracing::{debug, error};

use super::route::{PageRoute, StaticPage, classify};
use crate::models::blog_post::BlogPost;
use crate::services::store::BlogStore;

/// Maximum description length taken from a post body (before the ellipsis).
const DESCRIPTION_CHARS: usize = 160;
const KEYWORDS_MAX_CHARS: usize = 160;
const KEYWORDS_TRUNCATED_CHARS: usize = 157;
const DEFAULT_TWITTER_CARD: &str = "summary_large_image";

/// Title words too common to be useful keywords.
const KEYWORD_STOPWORDS: [&str; 10] = [
    "that", "with", "your", "from", "this", "they", "have", "will", "been", "than",
];

/// Everything the head injector needs to describe one page.
///
/// Built fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    /// Absolute URL.
    pub og_image: Option<String>,
    /// Absolute URL; also used as the canonical link.
    pub og_url: Option<String>,
    pub twitter_card: Option<String>,
    /// Comma-separated terms.
    pub keywords: Option<String>,
}

/// Site-wide identity used when building metadata.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub name: String,
    /// Absolute origin without a trailing slash, e.g. `https://engagebot.live`.
    pub base_url: String,
    /// Absolute URL of the image used when a page has none of its own.
    pub default_image: String,
    pub author: String,
    /// Leading phrase of every derived keyword list.
    pub base_keywords: String,
}

impl SiteProfile {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        let name = name.into();
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            default_image: format!("{}/favicon.webp", base_url),
            author: format!("{} Team", name),
            base_keywords: "Twitter automation, AI engagement, social media automation".into(),
            name,
            base_url,
        }
    }

    /// Absolute URL for a site path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Resolve an image reference that may be site-relative.
    pub fn absolute_url(&self, url: &str) -> String {
        if url.starts_with("https://") || url.starts_with("http://") || url.starts_with("//") {
            url.to_string()
        } else if url.starts_with('/') {
            self.url(url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self::new("EngageBot", "https://engagebot.live")
    }
}

struct PageCopy {
    path: &'static str,
    title: &'static str,
    description: &'static str,
    og_title: &'static str,
    og_description: &'static str,
    keywords: &'static str,
}

impl PageCopy {
    fn to_metadata(&self, site: &SiteProfile) -> PageMetadata {
        PageMetadata {
            title: self.title.into(),
            description: self.description.into(),
            og_title: Some(self.og_title.into()),
            og_description: Some(self.og_description.into()),
            og_image: Some(site.default_image.clone()),
            og_url: Some(site.url(self.path)),
            twitter_card: Some(DEFAULT_TWITTER_CARD.into()),
            keywords: Some(self.keywords.into()),
        }
    }
}

const HOME_COPY: PageCopy = PageCopy {
    path: "",
    title: "EngageBot - AI-Powered Twitter Engagement Automation",
    description: "Transform Twitter engagement with AI automation. EngageBot uses Claude 4.0 to discover conversations, generate authentic responses, and build meaningful relationships at scale.",
    og_title: "EngageBot - AI-Powered Twitter Engagement Automation",
    og_description: "Transform Twitter engagement with AI automation. EngageBot uses Claude 4.0 to discover conversations, generate authentic responses, and build meaningful relationships at scale.",
    keywords: "Twitter automation, AI engagement, social media automation, Twitter bot, engagement automation, social media marketing",
};

const BLOG_INDEX_COPY: PageCopy = PageCopy {
    path: "/blog",
    title: "Twitter Automation Blog | EngageBot Insights & Strategies",
    description: "Discover advanced Twitter automation strategies, AI engagement techniques, and social media growth tactics. Expert insights for scaling your Twitter presence with EngageBot.",
    og_title: "Twitter Automation Blog | EngageBot Insights & Strategies",
    og_description: "Discover advanced Twitter automation strategies, AI engagement techniques, and social media growth tactics. Expert insights for scaling your Twitter presence with EngageBot.",
    keywords: "Twitter automation blog, social media strategies, AI engagement, Twitter growth, automation techniques, social media marketing",
};

const CASE_STUDIES_COPY: PageCopy = PageCopy {
    path: "/case-studies",
    title: "Customer Success Stories & Case Studies | EngageBot",
    description: "Discover how businesses across industries use EngageBot to build authority, generate leads, and grow their Twitter presence. Real results from real companies using AI-powered engagement automation.",
    og_title: "EngageBot Customer Success Stories & Case Studies",
    og_description: "See real results from companies using EngageBot AI Twitter automation. Case studies showing increased followers, engagement rates, and lead generation across multiple industries.",
    keywords: "EngageBot case studies, Twitter automation success stories, social media ROI, B2B lead generation, customer testimonials, AI engagement results",
};

const VS_BUFFER_COPY: PageCopy = PageCopy {
    path: "/vs-buffer",
    title: "EngageBot vs Buffer: AI Engagement vs Content Scheduling | 2025 Comparison",
    description: "Compare EngageBot's AI-powered Twitter engagement with Buffer's content scheduling. See why authentic conversation automation outperforms basic posting tools for building authority and generating leads.",
    og_title: "EngageBot vs Buffer - AI Engagement vs Content Scheduling",
    og_description: "Detailed comparison: EngageBot's intelligent Twitter engagement automation vs Buffer's content scheduling. Discover which tool drives better ROI for B2B growth and thought leadership.",
    keywords: "EngageBot vs Buffer, Twitter automation comparison, AI engagement vs scheduling, social media tools comparison, Buffer alternative",
};

const VS_PLANNABLE_COPY: PageCopy = PageCopy {
    path: "/vs-plannable",
    title: "EngageBot vs Plannable: AI Engagement vs Social Media Planning | 2025",
    description: "Compare EngageBot's AI-powered engagement automation with Plannable's social media planning tools. See how intelligent conversation participation beats content planning for Twitter growth.",
    og_title: "EngageBot vs Plannable - AI Engagement vs Social Planning",
    og_description: "EngageBot's intelligent Twitter engagement vs Plannable's social media planning. Learn which approach delivers better results for building authority and generating qualified leads.",
    keywords: "EngageBot vs Plannable, social media automation comparison, AI engagement vs planning, Twitter growth tools, Plannable alternative",
};

const VS_SPROUTSOCIAL_COPY: PageCopy = PageCopy {
    path: "/vs-sproutsocial",
    title: "EngageBot vs Sprout Social: AI Engagement vs Enterprise Social Tools | 2025",
    description: "Compare EngageBot's AI-powered Twitter engagement with Sprout Social's enterprise social media management. Discover why intelligent engagement outperforms traditional social tools for B2B growth.",
    og_title: "EngageBot vs Sprout Social - AI Engagement vs Enterprise Tools",
    og_description: "Detailed comparison: EngageBot's intelligent Twitter automation vs Sprout Social's enterprise features. See which platform delivers better ROI for B2B companies and startups.",
    keywords: "EngageBot vs Sprout Social, enterprise social media tools, AI engagement vs traditional tools, B2B social media automation, Sprout Social alternative",
};

const VS_HYPEFURY_COPY: PageCopy = PageCopy {
    path: "/vs-hypefury",
    title: "EngageBot vs Hypefury: AI Engagement vs Growth Automation | 2025",
    description: "Compare EngageBot's intelligent Twitter engagement with Hypefury's growth automation. Learn why authentic AI-powered conversations beat mechanical growth hacks for sustainable authority building.",
    og_title: "EngageBot vs Hypefury - AI Engagement vs Growth Automation",
    og_description: "EngageBot's intelligent engagement automation vs Hypefury's growth hacks. Discover which approach builds real authority and generates quality leads for long-term Twitter success.",
    keywords: "EngageBot vs Hypefury, Twitter growth automation, AI engagement vs growth hacks, authentic automation vs mechanical tools, Hypefury alternative",
};

const PRICING_COPY: PageCopy = PageCopy {
    path: "/pricing",
    title: "Pricing - EngageBot AI Twitter Automation",
    description: "Choose the perfect EngageBot plan for your Twitter automation needs. Flexible pricing for individuals, teams, and enterprises. Start your free trial today.",
    og_title: "EngageBot Pricing - AI Twitter Automation Plans",
    og_description: "Choose the perfect EngageBot plan for your Twitter automation needs. Flexible pricing for individuals, teams, and enterprises. Start your free trial today.",
    keywords: "EngageBot pricing, Twitter automation pricing, social media automation cost, AI engagement plans",
};

const FEATURES_COPY: PageCopy = PageCopy {
    path: "/features",
    title: "Features - EngageBot AI Twitter Automation Platform",
    description: "Explore EngageBot's powerful AI features: smart conversation discovery, authentic response generation, analytics, and more. Scale your Twitter engagement effortlessly.",
    og_title: "EngageBot Features - AI Twitter Automation Platform",
    og_description: "Explore EngageBot's powerful AI features: smart conversation discovery, authentic response generation, analytics, and more. Scale your Twitter engagement effortlessly.",
    keywords: "Twitter automation features, AI engagement tools, social media automation, Twitter bot features, engagement automation",
};

fn static_copy(page: StaticPage) -> &'static PageCopy {
    match page {
        StaticPage::CaseStudies => &CASE_STUDIES_COPY,
        StaticPage::VsBuffer => &VS_BUFFER_COPY,
        StaticPage::VsPlannable => &VS_PLANNABLE_COPY,
        StaticPage::VsSproutSocial => &VS_SPROUTSOCIAL_COPY,
        StaticPage::VsHypefury => &VS_HYPEFURY_COPY,
        StaticPage::Pricing => &PRICING_COPY,
        StaticPage::Features => &FEATURES_COPY,
    }
}

pub fn home_metadata(site: &SiteProfile) -> PageMetadata {
    HOME_COPY.to_metadata(site)
}

pub fn blog_index_metadata(site: &SiteProfile) -> PageMetadata {
    BLOG_INDEX_COPY.to_metadata(site)
}

pub fn static_page_metadata(page: StaticPage, site: &SiteProfile) -> PageMetadata {
    static_copy(page).to_metadata(site)
}

/// Metadata derived from a stored post.
pub fn blog_post_metadata(post: &BlogPost, site: &SiteProfile) -> PageMetadata {
    let description = post_description(post);
    let og_image = post
        .image_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .map(|url| site.absolute_url(url))
        .unwrap_or_else(|| site.default_image.clone());

    PageMetadata {
        title: format!("{} | {}", post.title, site.name),
        og_title: Some(post.title.clone()),
        og_description: Some(description.clone()),
        description,
        og_image: Some(og_image),
        og_url: Some(site.url(&format!("/blog/{}", post.slug))),
        twitter_card: Some(DEFAULT_TWITTER_CARD.into()),
        keywords: Some(derive_keywords(
            &site.base_keywords,
            &post.title,
            &post.category,
        )),
    }
}

/// The post's excerpt, or the opening of its body with heading markers removed.
///
/// Either way the result is at most 160 characters plus `...`.
pub fn post_description(post: &BlogPost) -> String {
    let excerpt = post.excerpt.trim();
    if !excerpt.is_empty() {
        if excerpt.chars().count() <= DESCRIPTION_CHARS {
            return excerpt.to_string();
        }
        let opening: String = excerpt.chars().take(DESCRIPTION_CHARS).collect();
        return format!("{}...", opening.trim_end());
    }
    let opening: String = post.content.chars().take(DESCRIPTION_CHARS).collect();
    format!("{}...", opening.replace('#', "").trim())
}

/// Keyword list for a post: base phrase, up to five notable title words, then
/// the category.
///
/// Title words are lowercased and kept only when longer than three
/// characters and not a stopword. `&` and `-` in the category become spaces,
/// runs of whitespace collapse to one, and results over 160 characters are
/// cut to 157 plus `...`.
pub fn derive_keywords(base: &str, title: &str, category: &str) -> String {
    let title = title.to_lowercase();
    let title_words = title
        .split_whitespace()
        .filter(|word| word.chars().count() > 3 && !KEYWORD_STOPWORDS.contains(word))
        .take(5);
    let category = category.to_lowercase().replace(['&', '-'], " ");

    let joined = std::iter::once(base)
        .chain(title_words)
        .chain(std::iter::once(category.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    let keywords = joined.split_whitespace().collect::<Vec<_>>().join(" ");

    if keywords.chars().count() > KEYWORDS_MAX_CHARS {
        let cut: String = keywords.chars().take(KEYWORDS_TRUNCATED_CHARS).collect();
        format!("{}...", cut)
    } else {
        keywords
    }
}

/// Resolves metadata for classified routes, consulting the store for posts.
pub struct MetadataResolver<'a> {
    store: &'a dyn BlogStore,
    site: &'a SiteProfile,
}

impl<'a> MetadataResolver<'a> {
    pub fn new(store: &'a dyn BlogStore, site: &'a SiteProfile) -> Self {
        Self { store, site }
    }

    /// Classify `path` and resolve its metadata.
    pub async fn resolve_path(&self, path: &str) -> PageMetadata {
        self.resolve(&classify(path)).await
    }

    /// Never fails: a missing post or a storage error yields the blog index
    /// metadata instead.
    pub async fn resolve(&self, route: &PageRoute) -> PageMetadata {
        match route {
            PageRoute::BlogPost { slug } => match self.store.post_by_slug(slug).await {
                Ok(Some(post)) => blog_post_metadata(&post, self.site),
                Ok(None) => {
                    debug!(slug = %slug, "no blog post for slug, using blog index metadata");
                    blog_index_metadata(self.site)
                }
                Err(err) => {
                    error!(slug = %slug, error = %err, "blog post lookup failed, using blog index metadata");
                    blog_index_metadata(self.site)
                }
            },
            PageRoute::BlogIndex => blog_index_metadata(self.site),
            PageRoute::Static(page) => static_page_metadata(*page, self.site),
            PageRoute::Home => home_metadata(self.site),
        }
    }
}
