use crate::{
    models::{PostModel, UserModel},
    services::user::AuthorSummary,
};
use serde::{ser::SerializeStruct, Serialize, Serializer};
use std::collections::{HashMap, HashSet};

/// Stack left before a nested `replies` level switches to a fresh segment.
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_SEGMENT: usize = 1024 * 1024;

#[derive(Debug)]
pub struct ReplyTreeNode {
    pub id: i32,
    pub thread_id: i32,
    pub author_id: i32,
    pub parent_post_id: Option<i32>,
    pub content: String,
    pub upvotes: i32,
    pub downvotes: i32,
    pub net_votes: i32,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
    pub author: Option<AuthorSummary>,
    pub user_vote: Option<i16>,
    pub replies: Vec<ReplyTreeNode>,
}

// Reply chains have no depth limit, so every level gets room to nest.
impl Serialize for ReplyTreeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || {
            let mut node = serializer.serialize_struct("ReplyTreeNode", 13)?;
            node.serialize_field("id", &self.id)?;
            node.serialize_field("thread_id", &self.thread_id)?;
            node.serialize_field("author_id", &self.author_id)?;
            node.serialize_field("parent_post_id", &self.parent_post_id)?;
            node.serialize_field("content", &self.content)?;
            node.serialize_field("upvotes", &self.upvotes)?;
            node.serialize_field("downvotes", &self.downvotes)?;
            node.serialize_field("net_votes", &self.net_votes)?;
            node.serialize_field("created_at", &self.created_at)?;
            node.serialize_field("updated_at", &self.updated_at)?;
            node.serialize_field("author", &self.author)?;
            node.serialize_field("user_vote", &self.user_vote)?;
            node.serialize_field("replies", &self.replies)?;
            node.end()
        })
    }
}

/// Drops descendants from a heap worklist instead of one stack frame per level.
impl Drop for ReplyTreeNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.replies);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.replies);
        }
    }
}

impl utoipa::ToSchema for ReplyTreeNode {
    fn name() -> std::borrow::Cow<'static, str> {
        "ReplyTreeNode".into()
    }
}

impl utoipa::PartialSchema for ReplyTreeNode {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        use utoipa::openapi::schema::{ArrayBuilder, ObjectBuilder, Schema, Type};
        use utoipa::openapi::Ref;
        use utoipa::PartialSchema;
        utoipa::openapi::RefOr::T(Schema::Object(
            ObjectBuilder::new()
                .schema_type(Type::Object)
                .property("id", i32::schema())
                .property("thread_id", i32::schema())
                .property("author_id", i32::schema())
                .property("parent_post_id", Option::<i32>::schema())
                .property("content", String::schema())
                .property("upvotes", i32::schema())
                .property("downvotes", i32::schema())
                .property("net_votes", i32::schema())
                .property("created_at", String::schema())
                .property("updated_at", String::schema())
                .property("author", Ref::from_schema_name("AuthorSummary"))
                .property("user_vote", Option::<i16>::schema())
                .property(
                    "replies",
                    ArrayBuilder::new()
                        .items(Ref::from_schema_name("ReplyTreeNode"))
                        .build(),
                )
                .required("id")
                .required("thread_id")
                .required("author_id")
                .required("content")
                .required("upvotes")
                .required("downvotes")
                .required("net_votes")
                .required("created_at")
                .required("updated_at")
                .required("replies")
                .build(),
        ))
    }
}

/// Nest a thread's posts under their parents.
///
/// `posts` must already be in creation order; that order is kept at every level.
/// Posts whose parent is not in `posts` can't be reached from the root and are dropped.
pub fn build_reply_tree(
    posts: Vec<PostModel>,
    authors: &HashMap<i32, UserModel>,
    viewer_votes: &HashMap<i32, i16>,
) -> Vec<ReplyTreeNode> {
    let mut children: HashMap<Option<i32>, Vec<i32>> = HashMap::new();
    let mut by_id: HashMap<i32, PostModel> = HashMap::with_capacity(posts.len());
    for post in posts {
        children.entry(post.parent_post_id).or_default().push(post.id);
        by_id.insert(post.id, post);
    }

    // Walk down from the roots; every post lands after its parent.
    let mut reachable = Vec::with_capacity(by_id.len());
    let mut seen = HashSet::with_capacity(by_id.len());
    let mut pending: Vec<i32> = children.get(&None).cloned().unwrap_or_default();
    while let Some(id) = pending.pop() {
        if !seen.insert(id) {
            continue;
        }
        reachable.push(id);
        if let Some(replies) = children.get(&Some(id)) {
            pending.extend(replies);
        }
    }

    // Finish replies before the post that holds them.
    let mut finished: HashMap<i32, ReplyTreeNode> = HashMap::with_capacity(reachable.len());
    for id in reachable.into_iter().rev() {
        let Some(post) = by_id.remove(&id) else {
            continue;
        };
        let replies = take_finished(&mut finished, children.get(&Some(id)));
        finished.insert(id, to_node(post, authors, viewer_votes, replies));
    }

    take_finished(&mut finished, children.get(&None))
}

fn take_finished(
    finished: &mut HashMap<i32, ReplyTreeNode>,
    ids: Option<&Vec<i32>>,
) -> Vec<ReplyTreeNode> {
    ids.into_iter()
        .flatten()
        .filter_map(|id| finished.remove(id))
        .collect()
}

fn to_node(
    post: PostModel,
    authors: &HashMap<i32, UserModel>,
    viewer_votes: &HashMap<i32, i16>,
    replies: Vec<ReplyTreeNode>,
) -> ReplyTreeNode {
    ReplyTreeNode {
        id: post.id,
        thread_id: post.thread_id,
        author_id: post.author_id,
        parent_post_id: post.parent_post_id,
        net_votes: post.net_votes(),
        upvotes: post.upvotes,
        downvotes: post.downvotes,
        created_at: post.created_at,
        updated_at: post.updated_at,
        author: authors.get(&post.author_id).map(AuthorSummary::from),
        user_vote: viewer_votes.get(&post.id).copied(),
        content: post.content,
        replies,
    }
}
