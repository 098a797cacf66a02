use std::collections::BTreeMap;

use crate::db::{MemoryStore, TableDef, row};
use crate::plan::Value;
use crate::schema::{EntityType, RelationDef, Schema};
use crate::sql::Dialect;


pub(crate) const BLOG_TABLES: [&str; 8] = [
    "Author",
    "Account",
    "AuthorMetadata",
    "Post",
    "Comment",
    "Commenter",
    "Tag",
    "TagPost",
];


/// Author -> {Account, AuthorMetadata (by name), Post -> {Comment -> Commenter, Tag via TagPost}}
pub(crate) fn blog_schema() -> Schema {
    Schema::builder()
        .register(
            EntityType::new("Author", "Author")
                .with_id_attribute("author_id")
                .with_relation("account", RelationDef::has_one("Account").foreign_key("authorId"))
                .with_relation(
                    "metadata",
                    RelationDef::has_one("AuthorMetadata")
                        .foreign_key("author")
                        .foreign_key_target("name"),
                )
                .with_relation("posts", RelationDef::has_many("Post"))
                .with_dependents(&["account", "metadata", "posts"]),
        )
        .register(EntityType::new("Account", "Account").with_id_attribute("account_id"))
        .register(EntityType::new("AuthorMetadata", "AuthorMetadata").with_id_attribute("metadata_id"))
        .register(
            EntityType::new("Post", "Post")
                .with_id_attribute("post_id")
                .with_relation("comments", RelationDef::has_many("Comment"))
                .with_relation("tags", RelationDef::belongs_to_many("Tag").join_table("TagPost"))
                .with_dependents(&["comments", "tags"]),
        )
        .register(
            EntityType::new("Comment", "Comment")
                .with_id_attribute("comment_id")
                .with_relation("commenter", RelationDef::has_one("Commenter").foreign_key("commentId"))
                .with_dependents(&["commenter"]),
        )
        .register(EntityType::new("Commenter", "Commenter").with_id_attribute("commenter_id"))
        .register(EntityType::new("Tag", "Tag").with_id_attribute("tag_id"))
        .register(EntityType::new("TagPost", "TagPost").without_id_attribute())
        .build()
        .expect("blog schema is valid")
}


pub(crate) async fn blog_store() -> MemoryStore {
    let store = MemoryStore::new(Dialect::Postgres);
    let tables = [
        TableDef::new("Author").with_primary_key("author_id"),
        TableDef::new("Account")
            .with_primary_key("account_id")
            .references("authorId", "Author", "author_id"),
        TableDef::new("AuthorMetadata")
            .with_primary_key("metadata_id")
            .references("author", "Author", "name"),
        TableDef::new("Post")
            .with_primary_key("post_id")
            .references("authorId", "Author", "author_id"),
        TableDef::new("Comment")
            .with_primary_key("comment_id")
            .references("postId", "Post", "post_id"),
        TableDef::new("Commenter")
            .with_primary_key("commenter_id")
            .references("commentId", "Comment", "comment_id"),
        TableDef::new("Tag").with_primary_key("tag_id"),
        TableDef::new("TagPost")
            .references("tagId", "Tag", "tag_id")
            .references("postId", "Post", "post_id"),
    ];

    for table in tables {
        store.create_table(table).await.expect("fixture table");
    }
    store
}


pub(crate) struct AuthorChain {
    pub author: Value,
    pub posts: Vec<Value>,
}

/// One author with an account, metadata, and `posts` posts, each with a
/// comment, a commenter and one tag.
pub(crate) async fn seed_author(store: &MemoryStore, name: &str, posts: usize) -> AuthorChain {
    let author = insert(store, "Author", &[("name", name.into())]).await;
    insert(store, "Account", &[("authorId", author.clone())]).await;
    insert(store, "AuthorMetadata", &[("author", name.into())]).await;

    let mut post_ids = Vec::with_capacity(posts);
    for _ in 0..posts {
        let post = insert(store, "Post", &[("authorId", author.clone())]).await;
        let comment = insert(store, "Comment", &[("postId", post.clone())]).await;
        insert(store, "Commenter", &[("commentId", comment)]).await;
        let tag = insert(store, "Tag", &[]).await;
        store
            .insert("TagPost", row(&[("tagId", tag), ("postId", post.clone())]))
            .await
            .expect("fixture row");
        post_ids.push(post);
    }

    AuthorChain {
        author,
        posts: post_ids,
    }
}

async fn insert(store: &MemoryStore, table: &str, pairs: &[(&str, Value)]) -> Value {
    store
        .insert(table, row(pairs))
        .await
        .expect("fixture row")
        .expect("fixture table has a primary key")
}


pub(crate) async fn counts(store: &MemoryStore) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for table in BLOG_TABLES {
        counts.insert(table, store.count(table).await.expect("fixture table"));
    }
    counts
}
