//! Thread reconstruction: one record in, one rooted reply tree out.
//!
//! Sub-comments carry a `reply_comment.id` that may point at any comment of the
//! same post, not just the one they are nested under. Attachment goes through a
//! post-wide parent -> children index and only nodes reachable from a top-level
//! comment end up in the tree. Everything else is built (so the counter sees the
//! key) and then dropped.

use crate::counting::InteractionCounter;
use crate::profile::ProfileMap;
use crate::record::{id_key, Comment, Record, Repost, UserRef};
use crate::tree::{NodeKind, TreeNode};
use ahash::{AHashMap, AHashSet};
use serde_json::Value;

/// Rebuild `record` into a tree rooted at the original post.
///
/// `counts` must already hold the finished counting pass for the record's
/// partition; this only reads it (registering absent keys at 0).
pub fn build_thread(record: &Record, profiles: &ProfileMap, counts: &mut InteractionCounter) -> TreeNode {
    let root_author = record.author_key();
    let mut root = TreeNode {
        id: record.id.clone(),
        user_id: record.user.id.clone(),
        user: record.user.screen_name.clone(),
        interests: profiles.interests_of(&root_author).to_vec(),
        content: record.text().to_string(),
        kind: NodeKind::OriginalPost,
        depth: 0,
        replies: Vec::new(),
        interaction_count: None,
    };

    root.replies
        .extend(build_comment_forest(&record.comments, &root_author, profiles, counts));
    root.replies
        .extend(build_reposts(&record.reposts, &root_author, profiles, counts));
    root
}

fn make_node(
    id: &Value,
    user: &UserRef,
    content: &str,
    kind: NodeKind,
    root_author: &str,
    profiles: &ProfileMap,
    counts: &mut InteractionCounter,
) -> TreeNode {
    let uid = user.key();
    TreeNode {
        id: id.clone(),
        user_id: user.id.clone(),
        user: user.screen_name.clone(),
        interests: profiles.interests_of(&uid).to_vec(),
        content: content.to_string(),
        kind,
        depth: 1,
        replies: Vec::new(),
        interaction_count: Some(counts.read_or_init(root_author, &uid)),
    }
}

/// Position of a node in the attachment order.
struct Placed {
    key: String,
    parent: Option<usize>,
    depth: u32,
}

fn build_comment_forest(
    comments: &[Comment],
    root_author: &str,
    profiles: &ProfileMap,
    counts: &mut InteractionCounter,
) -> Vec<TreeNode> {
    let mut nodes: AHashMap<String, TreeNode> = AHashMap::new();
    let mut children: AHashMap<String, Vec<String>> = AHashMap::new();
    let mut tops: Vec<String> = Vec::new();

    for c in comments.iter().filter(|c| !c.is_image()) {
        let cid = id_key(&c.id);
        let node = make_node(&c.id, &c.user, c.text(), NodeKind::Comment, root_author, profiles, counts);
        nodes.insert(cid.clone(), node);

        for sub in c.comments.iter().filter(|s| !s.is_image()) {
            let sid = id_key(&sub.id);
            let node = make_node(&sub.id, &sub.user, sub.text(), NodeKind::Comment, root_author, profiles, counts);
            nodes.insert(sid.clone(), node);
            let parent = sub.reply_target().map(id_key).unwrap_or_else(|| cid.clone());
            children.entry(parent).or_default().push(sid);
        }
        tops.push(cid);
    }

    // Pre-order placement from each attachment root. Each node is placed at most once.
    let mut placed: Vec<Placed> = Vec::new();
    let mut seen: AHashSet<String> = AHashSet::new();
    for top in tops {
        if !seen.insert(top.clone()) {
            continue;
        }
        placed.push(Placed { key: top, parent: None, depth: 1 });
        let mut stack = vec![placed.len() - 1];
        while let Some(i) = stack.pop() {
            let Some(kids) = children.get(&placed[i].key) else { continue };
            let depth = placed[i].depth + 1;
            for kid in kids {
                if seen.insert(kid.clone()) {
                    placed.push(Placed { key: kid.clone(), parent: Some(i), depth });
                    stack.push(placed.len() - 1);
                }
            }
        }
    }

    // Children always sit after their parent, so assembling back to front
    // finishes every subtree before its parent is taken.
    let mut pending: Vec<Vec<TreeNode>> = (0..placed.len()).map(|_| Vec::new()).collect();
    let mut roots: Vec<TreeNode> = Vec::new();
    for (i, p) in placed.iter().enumerate().rev() {
        let Some(mut node) = nodes.remove(&p.key) else { continue };
        node.depth = p.depth;
        let mut replies = std::mem::take(&mut pending[i]);
        replies.reverse();
        node.replies = replies;
        match p.parent {
            Some(parent) => pending[parent].push(node),
            None => roots.push(node),
        }
    }
    roots.reverse();

    if !nodes.is_empty() {
        tracing::debug!(orphans = nodes.len(), "dropping unattached sub-comments");
    }
    roots
}

fn build_reposts(
    reposts: &[Repost],
    root_author: &str,
    profiles: &ProfileMap,
    counts: &mut InteractionCounter,
) -> Vec<TreeNode> {
    reposts
        .iter()
        .filter(|r| !r.is_image())
        .map(|r| make_node(&r.id, &r.user, r.text(), NodeKind::Repost, root_author, profiles, counts))
        .collect()
}
