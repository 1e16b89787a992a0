//! Static crawler and asset tables used by the classifier.
//!
//! Entries are stored lower-cased so matching only has to lower-case the
//! request side once.

/// User-agent substrings identifying crawlers and link-preview bots.
pub const CRAWLER_USER_AGENTS: &[&str] = &[
    "googlebot",
    "yahoo! slurp",
    "bingbot",
    "yandex",
    "baiduspider",
    "facebookexternalhit",
    "twitterbot",
    "rogerbot",
    "linkedinbot",
    "embedly",
    "quora link preview",
    "showyoubot",
    "outbrain",
    "pinterest/0.",
    "developers.google.com/+/web/snippet",
    "slackbot",
    "vkshare",
    "w3c_validator",
    "redditbot",
    "applebot",
    "whatsapp",
    "flipboard",
    "tumblr",
    "bitlybot",
    "skypeuripreview",
    "nuzzel",
    "discordbot",
    "google page speed",
    "qwantify",
    "pinterestbot",
    "bitrix link preview",
    "xing-contenttabreceiver",
    "chrome-lighthouse",
    "telegrambot",
];

/// URL suffixes of static assets that are always served by the origin.
pub const IGNORED_EXTENSIONS: &[&str] = &[
    ".js", ".css", ".xml", ".less", ".png", ".jpg", ".jpeg", ".gif", ".pdf", ".doc", ".txt",
    ".ico", ".rss", ".zip", ".mp3", ".rar", ".exe", ".wmv", ".avi", ".ppt", ".mpg", ".mpeg",
    ".tif", ".wav", ".mov", ".psd", ".ai", ".xls", ".mp4", ".m4a", ".swf", ".dat", ".dmg",
    ".iso", ".flv", ".m4v", ".torrent", ".ttf", ".woff", ".svg", ".eot",
];

/// Returns the first crawler signature contained in an already lower-cased user agent.
pub fn matching_crawler(user_agent_lower: &str) -> Option<&'static str> {
    CRAWLER_USER_AGENTS
        .iter()
        .copied()
        .find(|signature| user_agent_lower.contains(signature))
}

/// Returns the ignored extension an already lower-cased URL ends with, if any.
pub fn matching_extension(url_lower: &str) -> Option<&'static str> {
    IGNORED_EXTENSIONS
        .iter()
        .copied()
        .find(|extension| url_lower.ends_with(extension))
}
