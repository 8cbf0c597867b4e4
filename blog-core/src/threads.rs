//! Дерево обсуждения, собранное из плоского списка комментариев.
//!
//! Лес строится один раз на каждую загрузку: узлы лежат в арене, а ответы
//! каждого узла находятся через индекс `parent_id -> дети`.

use std::collections::{HashMap, HashSet};

use crate::models::Comment;

/// Предельный визуальный отступ. Более глубокие ответы остаются дочерними
/// узлами, но рисуются с тем же отступом.
pub const MAX_INDENT_DEPTH: usize = 3;

#[derive(Debug, Clone, PartialEq)]
struct Node {
    comment: Comment,
    replies: Vec<usize>,
    depth: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Лес веток обсуждения.
pub struct CommentForest {
    nodes: Vec<Node>,
    roots: Vec<usize>,
    orphans: usize,
}

#[derive(Debug, Clone, PartialEq)]
/// Владеющее представление ветки: комментарий и его прямые ответы.
pub struct CommentThread {
    /// Комментарий узла.
    pub comment: Comment,
    /// Прямые ответы в порядке поступления.
    pub replies: Vec<CommentThread>,
}

#[derive(Debug, Clone, Copy)]
/// Ссылка на узел леса.
pub struct ThreadNode<'a> {
    forest: &'a CommentForest,
    index: usize,
}

impl CommentForest {
    /// Собирает лес из комментариев в порядке их поступления.
    ///
    /// Комментарии верхнего уровня становятся корнями. Комментарии, чей
    /// родитель отсутствует в списке, недостижимы и не отображаются.
    pub fn build(comments: Vec<Comment>) -> Self {
        let mut children: HashMap<i64, Vec<usize>> = HashMap::new();
        let mut roots = Vec::new();
        for (index, comment) in comments.iter().enumerate() {
            match comment.parent_id {
                Some(parent_id) => children.entry(parent_id).or_default().push(index),
                None => roots.push(index),
            }
        }

        let mut nodes: Vec<Node> = comments
            .into_iter()
            .map(|comment| Node {
                comment,
                replies: Vec::new(),
                depth: 0,
            })
            .collect();

        // Обход в глубину без рекурсии; повторно узел не посещается, даже если
        // идентификаторы комментариев продублированы.
        let mut visited = HashSet::with_capacity(nodes.len());
        let mut stack: Vec<(usize, usize)> = roots.iter().rev().map(|&root| (root, 0)).collect();
        while let Some((index, depth)) = stack.pop() {
            if !visited.insert(index) {
                continue;
            }
            let replies: Vec<usize> = children
                .get(&nodes[index].comment.id)
                .map(|replies| {
                    replies
                        .iter()
                        .copied()
                        .filter(|reply| !visited.contains(reply))
                        .collect()
                })
                .unwrap_or_default();

            stack.extend(replies.iter().rev().map(|&reply| (reply, depth + 1)));
            let node = &mut nodes[index];
            node.depth = depth;
            node.replies = replies;
        }

        let orphans = nodes.len() - visited.len();
        if orphans > 0 {
            tracing::warn!(orphans, "comments with unknown parent are not rendered");
        }

        Self {
            nodes,
            roots,
            orphans,
        }
    }

    /// Ветки верхнего уровня.
    pub fn roots(&self) -> impl Iterator<Item = ThreadNode<'_>> + '_ {
        self.roots.iter().map(move |&index| ThreadNode {
            forest: self,
            index,
        })
    }

    /// Комментарии в порядке отрисовки (в глубину) вместе с отступом.
    pub fn render_order(&self) -> Vec<(usize, &Comment)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<ThreadNode<'_>> = self.roots().collect();
        stack.reverse();
        while let Some(node) = stack.pop() {
            out.push((node.indent(), node.comment()));
            let replies: Vec<ThreadNode<'_>> = node.replies().collect();
            stack.extend(replies.into_iter().rev());
        }
        out
    }

    /// Владеющая вложенная копия леса.
    pub fn to_threads(&self) -> Vec<CommentThread> {
        self.roots().map(|node| node.to_thread()).collect()
    }

    /// Ищет отображаемый комментарий по идентификатору.
    pub fn find(&self, id: i64) -> Option<&Comment> {
        self.render_order()
            .into_iter()
            .map(|(_, comment)| comment)
            .find(|comment| comment.id == id)
    }

    /// Количество комментариев, включая недостижимые.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Лес пуст.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Сколько комментариев ссылается на отсутствующего родителя.
    pub fn orphan_count(&self) -> usize {
        self.orphans
    }
}

impl<'a> ThreadNode<'a> {
    fn node(&self) -> &'a Node {
        &self.forest.nodes[self.index]
    }

    /// Комментарий узла.
    pub fn comment(&self) -> &'a Comment {
        &self.node().comment
    }

    /// Структурная глубина (у корня 0).
    pub fn depth(&self) -> usize {
        self.node().depth
    }

    /// Визуальный отступ, ограниченный [`MAX_INDENT_DEPTH`].
    pub fn indent(&self) -> usize {
        self.depth().min(MAX_INDENT_DEPTH)
    }

    /// Прямые ответы в порядке поступления.
    pub fn replies(&self) -> impl Iterator<Item = ThreadNode<'a>> + 'a {
        let forest = self.forest;
        self.node()
            .replies
            .iter()
            .map(move |&index| ThreadNode { forest, index })
    }

    fn to_thread(self) -> CommentThread {
        CommentThread {
            comment: self.comment().clone(),
            replies: self.replies().map(ThreadNode::to_thread).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn comment(id: i64, parent_id: Option<i64>) -> Comment {
        let ts = Utc.timestamp_opt(1_700_000_000 + id, 0).single().expect("valid ts");
        Comment {
            id,
            content: format!("comment {id}"),
            user_id: "u1".to_string(),
            post_id: 1,
            parent_id,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn ids<'a>(nodes: impl Iterator<Item = ThreadNode<'a>>) -> Vec<i64> {
        nodes.map(|node| node.comment().id).collect()
    }

    #[test]
    fn builds_roots_and_nested_replies() {
        let forest = CommentForest::build(vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, None),
            comment(4, Some(2)),
        ]);

        assert_eq!(ids(forest.roots()), vec![1, 3]);
        let first = forest.roots().next().expect("root 1");
        assert_eq!(ids(first.replies()), vec![2]);
        let second = first.replies().next().expect("node 2");
        assert_eq!(ids(second.replies()), vec![4]);
        assert_eq!(second.depth(), 1);
    }

    #[test]
    fn replies_keep_supplied_order_even_before_parent() {
        let forest = CommentForest::build(vec![
            comment(5, Some(1)),
            comment(1, None),
            comment(3, Some(1)),
        ]);

        let root = forest.roots().next().expect("root");
        assert_eq!(ids(root.replies()), vec![5, 3]);
    }

    #[test]
    fn building_twice_is_identical() {
        let input = vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, None),
            comment(4, Some(2)),
        ];

        let first = CommentForest::build(input.clone());
        let second = CommentForest::build(input);
        assert_eq!(first, second);
        assert_eq!(first.to_threads(), second.to_threads());
    }

    #[test]
    fn indent_is_capped_but_structure_is_not() {
        let forest = CommentForest::build(vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, Some(2)),
            comment(4, Some(3)),
            comment(5, Some(4)),
        ]);

        let order: Vec<(usize, i64)> = forest
            .render_order()
            .into_iter()
            .map(|(indent, comment)| (indent, comment.id))
            .collect();
        assert_eq!(order, vec![(0, 1), (1, 2), (2, 3), (3, 4), (3, 5)]);

        let threads = forest.to_threads();
        let deepest = &threads[0].replies[0].replies[0].replies[0].replies[0];
        assert_eq!(deepest.comment.id, 5);
    }

    #[test]
    fn render_order_is_depth_first() {
        let forest = CommentForest::build(vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, None),
            comment(4, Some(2)),
            comment(5, Some(1)),
        ]);

        let order: Vec<i64> = forest
            .render_order()
            .into_iter()
            .map(|(_, comment)| comment.id)
            .collect();
        assert_eq!(order, vec![1, 2, 4, 5, 3]);
    }

    #[test]
    fn orphans_and_cycles_are_not_rendered() {
        let forest = CommentForest::build(vec![
            comment(1, None),
            comment(2, Some(99)),
            comment(3, Some(4)),
            comment(4, Some(3)),
        ]);

        assert_eq!(forest.len(), 4);
        assert_eq!(forest.orphan_count(), 3);
        assert_eq!(forest.render_order().len(), 1);
        assert!(forest.find(2).is_none());
        assert!(forest.find(1).is_some());
    }

    #[test]
    fn empty_input_builds_empty_forest() {
        let forest = CommentForest::build(Vec::new());
        assert!(forest.is_empty());
        assert_eq!(forest.roots().count(), 0);
        assert!(forest.to_threads().is_empty());
    }
}
