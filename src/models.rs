use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 未填写图片时使用的默认图片
pub const DEFAULT_IMAGE_URL: &str = "https://picsum.photos/800/400";

/// 从生成内容截取摘要的字符数
const GENERATED_EXCERPT_CHARS: usize = 150;

/// 文章分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    #[default]
    Technology,
    Lifestyle,
    Travel,
    Food,
    Business,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Technology,
        Category::Lifestyle,
        Category::Travel,
        Category::Food,
        Category::Business,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Technology => "Technology",
            Category::Lifestyle => "Lifestyle",
            Category::Travel => "Travel",
            Category::Food => "Food",
            Category::Business => "Business",
        }
    }

    /// 循环到下一个分类
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// 循环到上一个分类
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category `{0}`")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// 博客文章
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub date: NaiveDate,
    pub category: Category,
    pub image_url: String,
}

impl Post {
    /// 按行拆分正文，空行保留为段落间隔
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n').map(str::trim)
    }

    pub fn author_initial(&self) -> char {
        self.author.chars().next().unwrap_or('?')
    }
}

/// 编辑器表单状态
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    /// 正在编辑的文章的 id 与日期；新建时为 `None`
    pub existing: Option<(String, NaiveDate)>,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub category: Category,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please fill in all required fields.")]
pub struct DraftError;

impl PostDraft {
    /// 新建文章的空白表单，图片占位随机取前一百张 picsum 图片之一
    pub fn new(now: DateTime<Utc>) -> Self {
        let pick = now.timestamp_subsec_millis() % 100;
        Self {
            existing: None,
            title: String::new(),
            excerpt: String::new(),
            content: String::new(),
            author: String::new(),
            category: Category::default(),
            image_url: format!("{DEFAULT_IMAGE_URL}?random={pick}"),
        }
    }

    pub fn from_post(post: &Post) -> Self {
        Self {
            existing: Some((post.id.clone(), post.date)),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            content: post.content.clone(),
            author: post.author.clone(),
            category: post.category,
            image_url: post.image_url.clone(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.existing.is_some()
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.trim().is_empty()
            || self.content.trim().is_empty()
            || self.author.trim().is_empty()
        {
            return Err(DraftError);
        }
        Ok(())
    }

    /// 生成待保存的文章。新建时 id 取当前毫秒时间戳，日期取 UTC 当天；编辑时两者保持不变
    pub fn into_post(self, now: DateTime<Utc>) -> Result<Post, DraftError> {
        self.validate()?;

        let (id, date) = self
            .existing
            .unwrap_or_else(|| (now.timestamp_millis().to_string(), now.date_naive()));
        let image_url = if self.image_url.trim().is_empty() {
            DEFAULT_IMAGE_URL.to_string()
        } else {
            self.image_url
        };

        Ok(Post {
            id,
            title: self.title,
            excerpt: self.excerpt,
            content: self.content,
            author: self.author,
            date,
            category: self.category,
            image_url,
        })
    }

    /// 用生成的文本填充正文和摘要
    pub fn apply_generated(&mut self, text: &str) {
        let head: String = text.chars().take(GENERATED_EXCERPT_CHARS).collect();
        self.excerpt = format!("{head}...");
        self.content = text.to_string();
    }
}

fn seed_post(
    id: &str,
    title: &str,
    excerpt: &str,
    content: &str,
    author: &str,
    (y, m, d): (i32, u32, u32),
    category: Category,
) -> Post {
    Post {
        id: id.to_string(),
        title: title.to_string(),
        excerpt: excerpt.to_string(),
        content: content.to_string(),
        author: author.to_string(),
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
        category,
        image_url: format!("{DEFAULT_IMAGE_URL}?random={id}"),
    }
}

/// 首次启动时写入的示例文章
pub fn seed_posts() -> Vec<Post> {
    vec![
        seed_post(
            "1",
            "The Future of AI in Web Development",
            "Exploring how artificial intelligence is reshaping the way we build web applications.",
            "Artificial Intelligence is rapidly transforming the landscape of web development. From intelligent code completion to automated testing and deployment, AI tools are empowering developers to work faster and more efficiently. \n\nOne of the most exciting areas is generative UI, where AI can draft entire interfaces based on simple text descriptions. However, the human touch remains essential for ensuring accessibility, user experience, and creativity. \n\nAs we look to the future, the collaboration between human developers and AI assistants will likely become the standard workflow, allowing for unprecedented levels of innovation.",
            "Alex Rivera",
            (2023, 10, 15),
            Category::Technology,
        ),
        seed_post(
            "2",
            "Top 10 Travel Destinations for 2024",
            "Discover the hidden gems and popular spots you must visit this year.",
            "The world is full of amazing places waiting to be explored. In 2024, travelers are looking for a mix of adventure, relaxation, and cultural immersion. \n\nJapan remains a top favorite with its blend of ancient tradition and futuristic cities. Meanwhile, the pristine beaches of Albania are gaining popularity as an affordable European summer destination. For those seeking nature, the rugged landscapes of Patagonia offer an unforgettable experience.",
            "Sarah Jenkins",
            (2023, 11, 2),
            Category::Travel,
        ),
        seed_post(
            "3",
            "Minimalism: A Guide to Simple Living",
            "How decluttering your space can lead to a clearer mind and a happier life.",
            "Minimalism is more than just an aesthetic; it is a lifestyle choice that emphasizes quality over quantity. By removing the excess from our lives, we make room for what truly matters.\n\nStart small by decluttering a single drawer or closet. Ask yourself if each item brings value or joy. Over time, this practice creates a serene environment that fosters focus and reduces stress.",
            "Marcus Chen",
            (2023, 12, 10),
            Category::Lifestyle,
        ),
    ]
}
