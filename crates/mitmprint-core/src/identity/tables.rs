//! Categorical code tables.
//!
//! Process-wide, immutable enumerations mapping canonical names to small
//! integer codes. Unknown names map to 0 — by contract these lookups never
//! fail, so malformed input degrades instead of erroring.

pub fn browser_code(name: &str) -> u32 {
    match name {
        "Chrome" => 1,
        "IE" => 2,
        "Safari" => 3,
        "Firefox" => 4,
        "Android" => 5,
        "Opera" => 6,
        "Blackberry" => 7,
        "UCBrowser" => 8,
        "Silk" => 9,
        "Nokia" => 10,
        "NetFront" => 11,
        "QQ" => 12,
        "Maxthon" => 13,
        "SogouExplorer" => 14,
        "Spotify" => 15,
        "Bot" => 16,
        "AppleBot" => 17,
        "BaiduBot" => 18,
        "BingBot" => 19,
        "DuckDuckGoBot" => 20,
        "FacebookBot" => 21,
        "GoogleBot" => 22,
        "LinkedInBot" => 23,
        "MsnBot" => 24,
        "PingdomBot" => 25,
        "TwitterBot" => 26,
        "YandexBot" => 27,
        "YahooBot" => 28,
        _ => 0,
    }
}

pub fn os_code(name: &str) -> u32 {
    match name {
        "WindowsPhone" => 1,
        "Windows" => 2,
        "MacOSX" => 3,
        "iOS" => 4,
        "Android" => 5,
        "Blackberry" => 6,
        "ChromeOS" => 7,
        "Kindle" => 8,
        "WebOS" => 9,
        "Linux" => 10,
        "Playstation" => 11,
        "Xbox" => 12,
        "Nintendo" => 13,
        "Bot" => 14,
        _ => 0,
    }
}

pub fn platform_code(name: &str) -> u32 {
    match name {
        "Windows" => 1,
        "Mac" => 2,
        "Linux" => 3,
        "iPad" => 4,
        "iPhone" => 5,
        "iPod" => 6,
        "Blackberry" => 7,
        "WindowsPhone" => 8,
        "Playstation" => 9,
        "Xbox" => 10,
        "Nintendo" => 11,
        "Bot" => 12,
        _ => 0,
    }
}

pub fn device_code(name: &str) -> u32 {
    match name {
        "Computer" => 1,
        "Tablet" => 2,
        "Phone" => 3,
        "Console" => 4,
        "Wearable" => 5,
        "TV" => 6,
        _ => 0,
    }
}
