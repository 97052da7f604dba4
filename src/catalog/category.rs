use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    NowPlaying,
    Popular,
    Upcoming,
    TopRated,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::NowPlaying,
        Category::Popular,
        Category::Upcoming,
        Category::TopRated,
    ];

    pub const HOME: [Category; 4] = [
        Category::NowPlaying,
        Category::Upcoming,
        Category::TopRated,
        Category::Popular,
    ];

    /// Position in [`Category::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Category::NowPlaying => 0,
            Category::Popular => 1,
            Category::Upcoming => 2,
            Category::TopRated => 3,
        }
    }

    pub fn from_slug(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "now_playing" | "nowplaying" => Some(Category::NowPlaying),
            "popular" => Some(Category::Popular),
            "upcoming" => Some(Category::Upcoming),
            "top_rated" | "toprated" => Some(Category::TopRated),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Category::NowPlaying => "now_playing",
            Category::Popular => "popular",
            Category::Upcoming => "upcoming",
            Category::TopRated => "top_rated",
        }
    }

    pub fn query_name(&self) -> &'static str {
        match self {
            Category::NowPlaying => "movies/nowPlaying",
            Category::Popular => "movies/popular",
            Category::Upcoming => "movies/upcoming",
            Category::TopRated => "movies/topRated",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::NowPlaying => "Now Playing",
            Category::Popular => "Popular Movies",
            Category::Upcoming => "Upcoming Movies",
            Category::TopRated => "Top Rated Movies",
        }
    }
}
