#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Post, seed_posts};

/// 存放全部文章的存储槽
pub const POSTS_SLOT: &str = "lumina_blog_posts";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("stored posts are not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// 键值存储后端
pub trait StorageBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// 内存存储（测试用）
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// 文件存储：每个键对应 `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open(dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.slot_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// 文章仓库
///
/// 每次写操作都完整地读取、修改并写回整个集合。
pub struct PostStore {
    backend: Box<dyn StorageBackend>,
}

impl PostStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// 若存储槽从未写入过，则写入示例文章。返回是否执行了写入。
    pub fn ensure_seeded(&mut self) -> Result<bool, StoreError> {
        if self.backend.read(POSTS_SLOT)?.is_some() {
            return Ok(false);
        }
        let seeds = seed_posts();
        self.persist(&seeds)?;
        info!(count = seeds.len(), "seeded sample posts");
        Ok(true)
    }

    /// 列出全部文章（不会触发写入）
    pub fn list(&self) -> Result<Vec<Post>, StoreError> {
        match self.backend.read(POSTS_SLOT)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn get(&self, id: &str) -> Result<Option<Post>, StoreError> {
        Ok(self.list()?.into_iter().find(|p| p.id == id))
    }

    /// 插入或更新：已存在则原位替换，否则插到最前
    pub fn save(&mut self, post: Post) -> Result<(), StoreError> {
        let mut posts = self.list()?;
        match posts.iter().position(|p| p.id == post.id) {
            Some(index) => {
                debug!(id = %post.id, index, "replacing post");
                posts[index] = post;
            }
            None => {
                debug!(id = %post.id, "inserting post");
                posts.insert(0, post);
            }
        }
        self.persist(&posts)
    }

    /// 删除文章；不存在的 id 不报错
    pub fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let mut posts = self.list()?;
        let before = posts.len();
        posts.retain(|p| p.id != id);
        debug!(id, removed = before - posts.len(), "deleting post");
        self.persist(&posts)
    }

    fn persist(&mut self, posts: &[Post]) -> Result<(), StoreError> {
        let content = serde_json::to_string(posts)?;
        self.backend.write(POSTS_SLOT, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::NaiveDate;

    fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            title: format!("Post {id}"),
            excerpt: "excerpt".to_string(),
            content: "first\nsecond".to_string(),
            author: "Dana".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            category: Category::Food,
            image_url: "https://example.com/a.png".to_string(),
        }
    }

    fn ids(store: &PostStore) -> Vec<String> {
        store.list().unwrap().into_iter().map(|p| p.id).collect()
    }

    fn seeded() -> PostStore {
        let mut store = PostStore::in_memory();
        store.ensure_seeded().unwrap();
        store
    }

    #[test]
    fn test_seed_once() {
        let mut store = PostStore::in_memory();
        assert!(store.list().unwrap().is_empty());

        assert!(store.ensure_seeded().unwrap());
        assert_eq!(store.list().unwrap(), seed_posts());

        assert!(!store.ensure_seeded().unwrap());
        assert_eq!(ids(&store), ["1", "2", "3"]);
    }

    #[test]
    fn test_seed_skipped_after_everything_deleted() {
        let mut store = seeded();
        for id in ["1", "2", "3"] {
            store.delete(id).unwrap();
        }
        assert!(!store.ensure_seeded().unwrap());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_get() {
        let mut store = seeded();
        let p = post("42");
        store.save(p.clone()).unwrap();
        assert_eq!(store.get("42").unwrap(), Some(p));
    }

    #[test]
    fn test_get_missing_is_none() {
        let store = seeded();
        assert_eq!(store.get("nope").unwrap(), None);
    }

    #[test]
    fn test_insert_goes_to_front() {
        let mut store = seeded();
        store.save(post("4")).unwrap();
        assert_eq!(ids(&store), ["4", "1", "2", "3"]);
    }

    #[test]
    fn test_update_keeps_position() {
        let mut store = seeded();
        let mut p = post("2");
        p.title = "Updated".to_string();
        store.save(p).unwrap();

        let posts = store.list().unwrap();
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[1].id, "2");
        assert_eq!(posts[1].title, "Updated");
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut store = seeded();
        let before = store.list().unwrap();
        store.delete("999").unwrap();
        assert_eq!(store.list().unwrap(), before);
    }

    #[test]
    fn test_delete_existing() {
        let mut store = seeded();
        store.delete("1").unwrap();
        assert_eq!(ids(&store), ["2", "3"]);
    }

    #[test]
    fn test_full_scenario() {
        let mut store = PostStore::in_memory();
        store.ensure_seeded().unwrap();
        assert_eq!(store.list().unwrap().len(), 3);

        store.save(post("4")).unwrap();
        assert_eq!(ids(&store), ["4", "1", "2", "3"]);

        store.delete("2").unwrap();
        assert_eq!(ids(&store), ["4", "1", "3"]);
    }

    #[test]
    fn test_corrupt_slot_surfaces_error() {
        let mut backend = MemoryStorage::new();
        backend.write(POSTS_SLOT, "not json").unwrap();
        let store = PostStore::new(backend);
        assert!(matches!(store.list(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_file_storage_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = PostStore::new(FileStorage::open(dir.path()).unwrap());
        store.ensure_seeded().unwrap();
        store.save(post("7")).unwrap();

        let reopened = PostStore::new(FileStorage::open(dir.path()).unwrap());
        assert_eq!(ids(&reopened), ["7", "1", "2", "3"]);
        assert!(dir.path().join("lumina_blog_posts.json").exists());
        assert!(!dir.path().join("lumina_blog_posts.json.tmp").exists());
    }
}
