//! In-memory store - used when no database is configured, and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use board_core::domain::{
    Badge, Post, PostQuery, PostReport, PostSort, PostStatus, Review, User, UserBadge, UserVote,
    VoteChange,
};
use board_core::error::RepoError;
use board_core::ports::{
    BadgeRepository, BaseRepository, PostRepository, ReportRepository, UserRepository,
    VoteRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    /// Keyed by (post_id, reporter_id).
    reports: HashMap<(Uuid, Uuid), PostReport>,
    /// Keyed by (user_id, post_id).
    votes: HashMap<(Uuid, Uuid), UserVote>,
    badges: HashMap<(Uuid, Badge), UserBadge>,
}

/// Every board table behind a single async lock.
///
/// Each repository call takes the lock once, so compound updates are atomic
/// the way a database transaction would be. Data is lost on process restart.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        let email_taken = tables
            .users
            .values()
            .any(|u| u.email == user.email && u.id != user.id);
        if email_taken {
            return Err(RepoError::Constraint("users.email".into()));
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id).ok_or(RepoError::NotFound)?;

        let owned: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|p| p.created_by == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            remove_post(&mut tables, post_id);
        }
        tables.reports.retain(|(_, reporter), _| *reporter != id);
        tables.votes.retain(|(user, _), _| *user != id);
        tables.badges.retain(|(user, _), _| *user != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn record_login(
        &self,
        user_id: Uuid,
        failed_attempts: i32,
        locked_until: Option<DateTime<Utc>>,
        at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(&user_id).ok_or(RepoError::NotFound)?;

        user.failed_attempts = failed_attempts;
        user.locked_until = locked_until;
        user.updated_at = at;
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&post.created_by) {
            return Err(RepoError::Constraint("posts.created_by".into()));
        }

        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&id) {
            return Err(RepoError::NotFound);
        }
        remove_post(&mut tables, id);
        Ok(())
    }
}

/// Remove a post together with its reports and votes.
fn remove_post(tables: &mut Tables, post_id: Uuid) {
    tables.posts.remove(&post_id);
    tables.reports.retain(|(reported, _), _| *reported != post_id);
    tables.votes.retain(|(_, voted), _| *voted != post_id);
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| p.created_by == user_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(posts)
    }

    async fn search(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();

        match query.sort {
            PostSort::Top => posts.sort_by(|a, b| {
                b.upvotes
                    .cmp(&a.upvotes)
                    .then_with(|| b.submitted_at.cmp(&a.submitted_at))
            }),
            PostSort::Newest => posts.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at)),
            PostSort::Oldest => posts.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at)),
        }

        Ok(posts
            .into_iter()
            .skip(usize::try_from(query.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn count_by_user(
        &self,
        user_id: Uuid,
        status: Option<PostStatus>,
    ) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        let count = tables
            .posts
            .values()
            .filter(|p| p.created_by == user_id)
            .filter(|p| status.is_none_or(|s| p.status == s))
            .count();
        Ok(count as u64)
    }

    async fn apply_review(&self, post_id: Uuid, review: &Review) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let tables = &mut *tables;

        let post = tables.posts.get_mut(&post_id).ok_or(RepoError::NotFound)?;
        post.status = review.status;
        post.reviewed_at = Some(review.reviewed_at);
        post.review_msg = Some(review.message.clone());

        if review.status == PostStatus::Declined {
            post.report_count = 0;
            tables.reports.retain(|(reported, _), _| *reported != post_id);
        }

        Ok(post.clone())
    }
}

#[async_trait]
impl ReportRepository for InMemoryStore {
    async fn exists(&self, post_id: Uuid, reporter_id: Uuid) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.reports.contains_key(&(post_id, reporter_id)))
    }

    async fn file(&self, report: PostReport) -> Result<i32, RepoError> {
        let mut tables = self.tables.write().await;
        let tables = &mut *tables;

        let key = (report.post_id, report.reporter_id);
        if tables.reports.contains_key(&key) {
            return Err(RepoError::Constraint("post_reports.post_id_reporter_id".into()));
        }
        let post = tables
            .posts
            .get_mut(&report.post_id)
            .ok_or(RepoError::NotFound)?;
        if post.status != PostStatus::Approved {
            return Err(RepoError::Stale("Only approved posts can be reported".into()));
        }

        post.report_count += 1;
        tables.reports.insert(key, report);
        Ok(post.report_count)
    }

    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<PostReport>, RepoError> {
        let tables = self.tables.read().await;
        let mut reports: Vec<PostReport> = tables
            .reports
            .values()
            .filter(|r| r.post_id == post_id)
            .cloned()
            .collect();
        reports.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(reports)
    }
}

#[async_trait]
impl VoteRepository for InMemoryStore {
    async fn find(&self, user_id: Uuid, post_id: Uuid) -> Result<Option<UserVote>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.votes.get(&(user_id, post_id)).cloned())
    }

    async fn apply(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        change: &VoteChange,
    ) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let tables = &mut *tables;

        let key = (user_id, post_id);
        let held = tables.votes.get(&key).map(|v| v.vote_type);
        if held != change.previous {
            return Err(RepoError::Constraint("user_votes.user_id_post_id".into()));
        }
        let (Some(post), Some(user)) = (tables.posts.get_mut(&post_id), tables.users.get_mut(&user_id))
        else {
            return Err(RepoError::NotFound);
        };

        match change.current {
            None => {
                tables.votes.remove(&key);
            }
            Some(vote_type) => {
                let now = Utc::now();
                tables
                    .votes
                    .entry(key)
                    .and_modify(|v| {
                        v.vote_type = vote_type;
                        v.updated_at = now;
                    })
                    .or_insert_with(|| UserVote::new(user_id, post_id, vote_type));
            }
        }

        post.upvotes += change.upvote_delta();
        post.downvotes += change.downvote_delta();
        user.points += change.points_delta();
        Ok(())
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.votes.keys().filter(|(user, _)| *user == user_id).count() as u64)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<UserVote>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .votes
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BadgeRepository for InMemoryStore {
    async fn exists(&self, user_id: Uuid, badge: Badge) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.badges.contains_key(&(user_id, badge)))
    }

    async fn award(&self, badge: UserBadge) -> Result<UserBadge, RepoError> {
        let mut tables = self.tables.write().await;

        let key = (badge.user_id, badge.badge);
        if tables.badges.contains_key(&key) {
            return Err(RepoError::Constraint("user_badges.user_id_badge".into()));
        }
        tables.badges.insert(key, badge.clone());
        Ok(badge)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<UserBadge>, RepoError> {
        let tables = self.tables.read().await;
        let mut badges: Vec<UserBadge> = tables
            .badges
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        badges.sort_by(|a, b| a.awarded_at.cmp(&b.awarded_at));
        Ok(badges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::domain::{PostDraft, Role, VoteType};

    async fn seed(store: &InMemoryStore) -> (User, Post) {
        let users: &dyn UserRepository = store;
        let posts: &dyn PostRepository = store;

        let user = users
            .save(User::new(
                "voter@example.com".into(),
                "Voter".into(),
                "hash".into(),
                Role::User,
            ))
            .await
            .unwrap();
        let draft = PostDraft::parse("General", "Open the library later").unwrap();
        let post = posts
            .save(Post::new(user.id, draft, PostStatus::Approved))
            .await
            .unwrap();
        (user, post)
    }

    #[tokio::test]
    async fn test_email_is_unique() {
        let store = InMemoryStore::new();
        let users: &dyn UserRepository = &store;
        let (user, _) = seed(&store).await;

        let twin = User::new(user.email.clone(), "Twin".into(), "hash".into(), Role::User);
        let result = users.save(twin).await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_vote_apply_adjusts_tally_and_points() {
        let store = InMemoryStore::new();
        let (user, post) = seed(&store).await;
        let votes: &dyn VoteRepository = &store;
        let posts: &dyn PostRepository = &store;
        let users: &dyn UserRepository = &store;

        let up = VoteChange::resolve(None, VoteType::Upvote);
        votes.apply(user.id, post.id, &up).await.unwrap();
        let flip = VoteChange::resolve(Some(VoteType::Upvote), VoteType::Downvote);
        votes.apply(user.id, post.id, &flip).await.unwrap();

        let post = posts.find_by_id(post.id).await.unwrap().unwrap();
        let user = users.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!((post.upvotes, post.downvotes), (0, 1));
        assert_eq!(user.points, -1);
        assert_eq!(votes.count_by_user(user.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_stale_vote_change_is_rejected() {
        let store = InMemoryStore::new();
        let (user, post) = seed(&store).await;
        let votes: &dyn VoteRepository = &store;

        let first = VoteChange::resolve(None, VoteType::Upvote);
        votes.apply(user.id, post.id, &first).await.unwrap();
        let result = votes.apply(user.id, post.id, &first).await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_duplicate_report_is_rejected() {
        let store = InMemoryStore::new();
        let (user, post) = seed(&store).await;
        let reports: &dyn ReportRepository = &store;

        let count = reports
            .file(PostReport::new(post.id, user.id, "spam").unwrap())
            .await
            .unwrap();
        assert_eq!(count, 1);

        let again = reports
            .file(PostReport::new(post.id, user.id, "still spam").unwrap())
            .await;
        assert!(matches!(again, Err(RepoError::Constraint(_))));
        assert!(reports.exists(post.id, user.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_decline_clears_reports() {
        let store = InMemoryStore::new();
        let (user, post) = seed(&store).await;
        let reports: &dyn ReportRepository = &store;
        let posts: &dyn PostRepository = &store;

        reports
            .file(PostReport::new(post.id, user.id, "rude").unwrap())
            .await
            .unwrap();
        let declined = posts
            .apply_review(post.id, &Review::decline(None).unwrap())
            .await
            .unwrap();

        assert_eq!(declined.status, PostStatus::Declined);
        assert_eq!(declined.report_count, 0);
        assert!(declined.reviewed_at.is_some());
        assert!(reports.find_by_post(post.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_badge_award_is_unique() {
        let store = InMemoryStore::new();
        let (user, _) = seed(&store).await;
        let badges: &dyn BadgeRepository = &store;

        badges
            .award(UserBadge::new(user.id, Badge::FirstVote))
            .await
            .unwrap();
        let again = badges.award(UserBadge::new(user.id, Badge::FirstVote)).await;

        assert!(matches!(again, Err(RepoError::Constraint(_))));
        assert_eq!(badges.find_by_user(user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_record_login_leaves_points_alone() {
        let store = InMemoryStore::new();
        let (user, post) = seed(&store).await;
        let users: &dyn UserRepository = &store;
        let votes: &dyn VoteRepository = &store;

        votes
            .apply(user.id, post.id, &VoteChange::resolve(None, VoteType::Upvote))
            .await
            .unwrap();
        let until = Utc::now();
        users
            .record_login(user.id, 3, Some(until), until)
            .await
            .unwrap();

        let stored = users.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.points, 1);
        assert_eq!(stored.failed_attempts, 3);
        assert_eq!(stored.locked_until, Some(until));
    }

    #[tokio::test]
    async fn test_reports_need_an_approved_post() {
        let store = InMemoryStore::new();
        let (user, post) = seed(&store).await;
        let posts: &dyn PostRepository = &store;
        let reports: &dyn ReportRepository = &store;

        posts
            .apply_review(post.id, &Review::decline(None).unwrap())
            .await
            .unwrap();
        let result = reports
            .file(PostReport::new(post.id, user.id, "spam").unwrap())
            .await;

        assert!(matches!(result, Err(RepoError::Stale(_))));
        assert!(!reports.exists(post.id, user.id).await.unwrap());
        let stored = posts.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(stored.report_count, 0);
    }
}
