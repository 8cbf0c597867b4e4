//! Лента постов и «мои посты» с постраничной навигацией.

use crate::error::ApiResult;
use crate::generation::{Generation, RequestTicket};
use crate::models::{Page, Post};
use crate::pagination::{self, MAX_VISIBLE_PAGES, PageAction, Paginator};
use crate::routes::Route;
use crate::session::Session;

use super::ViewStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Какие посты показывает список.
pub enum ListingScope {
    /// Все посты, `GET /api/posts`.
    All,
    /// Посты текущего пользователя, `GET /api/posts/my`; нужен токен.
    Mine,
}

impl ListingScope {
    /// Путь API для этой выборки.
    pub fn path(&self) -> &'static str {
        match self {
            Self::All => "/api/posts",
            Self::Mine => "/api/posts/my",
        }
    }

    fn requires_credential(&self) -> bool {
        matches!(self, Self::Mine)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Запрос страницы списка.
pub struct PageRequest {
    /// Билет для сопоставления ответа.
    pub ticket: RequestTicket,
    /// Выборка.
    pub scope: ListingScope,
    /// Номер страницы, начиная с 1.
    pub page: u32,
    /// Размер страницы.
    pub page_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Что фронтенду сделать дальше.
pub enum ListingStep {
    /// Загрузить страницу и прокрутить экран к началу.
    Fetch(PageRequest),
    /// Перейти на другой экран.
    Redirect(Route),
}

#[derive(Debug, Clone, PartialEq)]
/// Состояние постраничного списка постов.
pub struct ListingView {
    scope: ListingScope,
    page_size: u32,
    current_page: u32,
    total_pages: u32,
    total: u64,
    posts: Vec<Post>,
    status: ViewStatus,
    generation: Generation,
}

impl ListingView {
    /// Пустой список на первой странице.
    pub fn new(scope: ListingScope, page_size: u32) -> Self {
        Self {
            scope,
            page_size: page_size.max(1),
            current_page: 1,
            total_pages: 1,
            total: 0,
            posts: Vec::new(),
            status: ViewStatus::default(),
            generation: Generation::default(),
        }
    }

    /// Загружает текущую страницу заново (при открытии экрана).
    pub fn reload(&mut self, session: &Session) -> ListingStep {
        self.request(session, self.current_page)
    }

    /// Открывает список сразу на странице `page` (прямая ссылка); номер
    /// уточняется ответом сервера.
    pub fn open(&mut self, session: &Session, page: u32) -> ListingStep {
        self.request(session, page)
    }

    /// Обрабатывает кнопку навигации; `None`, если кнопка неактивна.
    pub fn navigate(&mut self, session: &Session, action: PageAction) -> Option<ListingStep> {
        let target = self.paginator().navigate(action)?;
        Some(self.request(session, target))
    }

    fn request(&mut self, session: &Session, page: u32) -> ListingStep {
        if self.scope.requires_credential() && !session.is_authenticated() {
            self.generation.invalidate();
            return ListingStep::Redirect(Route::Home);
        }

        self.current_page = page.max(1);
        self.status.start();
        ListingStep::Fetch(PageRequest {
            ticket: self.generation.begin(),
            scope: self.scope,
            page: self.current_page,
            page_size: self.page_size,
        })
    }

    /// Применяет ответ; возвращает `false`, если ответ устарел.
    pub fn resolve(&mut self, ticket: RequestTicket, result: ApiResult<Page<Post>>) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::debug!(scope = ?self.scope, "dropping stale page response");
            return false;
        }

        match result {
            Ok(page) => {
                self.total = page.total;
                self.total_pages = if page.total_pages == 0 {
                    pagination::total_pages(page.total, self.page_size)
                } else {
                    page.total_pages
                };
                let served = if page.page == 0 { self.current_page } else { page.page };
                self.current_page = pagination::clamp_page(served, self.total_pages);
                self.posts = page.items;
                self.status.finish();
            }
            Err(err) => {
                tracing::warn!(error = %err, page = self.current_page, "failed to load posts");
                self.status.fail(format!("Failed to load posts: {err}"));
            }
        }
        true
    }

    /// Пагинатор текущего состояния.
    pub fn paginator(&self) -> Paginator {
        Paginator::new(self.current_page, self.total_pages, MAX_VISIBLE_PAGES)
    }

    /// Выборка списка.
    pub fn scope(&self) -> ListingScope {
        self.scope
    }

    /// Посты текущей страницы.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Текущая страница.
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Общее количество постов по данным сервера.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Флаг загрузки и ошибка.
    pub fn status(&self) -> &ViewStatus {
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::error::ApiError;

    fn post(id: i64) -> Post {
        let now = Utc::now();
        Post {
            id,
            title: format!("post {id}"),
            content: String::new(),
            summary: String::new(),
            published: true,
            published_at: Some(now),
            created_at: now,
            updated_at: now,
            user_id: None,
        }
    }

    fn page(number: u32, ids: &[i64]) -> Page<Post> {
        Page {
            items: ids.iter().copied().map(post).collect(),
            total: 50,
            page: number,
            page_size: 10,
            total_pages: 5,
        }
    }

    fn fetch(step: Option<ListingStep>) -> PageRequest {
        match step {
            Some(ListingStep::Fetch(request)) => request,
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    fn ids(view: &ListingView) -> Vec<i64> {
        view.posts().iter().map(|post| post.id).collect()
    }

    #[test]
    fn reload_requests_first_page() {
        let mut view = ListingView::new(ListingScope::All, 10);
        let request = fetch(Some(view.reload(&Session::anonymous())));
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 10);
        assert!(view.status().is_loading());

        assert!(view.resolve(request.ticket, Ok(page(1, &[1, 2]))));
        assert_eq!(ids(&view), vec![1, 2]);
        assert_eq!(view.paginator().total_pages(), 5);
        assert!(!view.status().is_loading());
    }

    #[test]
    fn latest_page_wins_when_responses_arrive_out_of_order() {
        let session = Session::anonymous();
        let mut view = ListingView::new(ListingScope::All, 10);
        let first = fetch(Some(view.reload(&session)));
        view.resolve(first.ticket, Ok(page(1, &[1])));

        let second = fetch(view.navigate(&session, PageAction::Goto(2)));
        let third = fetch(view.navigate(&session, PageAction::Goto(3)));

        assert!(view.resolve(third.ticket, Ok(page(3, &[30]))));
        assert!(!view.resolve(second.ticket, Ok(page(2, &[20]))));

        assert_eq!(ids(&view), vec![30]);
        assert_eq!(view.current_page(), 3);
    }

    #[test]
    fn latest_page_wins_when_responses_arrive_in_order() {
        let session = Session::anonymous();
        let mut view = ListingView::new(ListingScope::All, 10);
        let first = fetch(Some(view.reload(&session)));
        view.resolve(first.ticket, Ok(page(1, &[1])));

        let second = fetch(view.navigate(&session, PageAction::Next));
        let third = fetch(view.navigate(&session, PageAction::Next));
        assert_eq!(third.page, 3);

        assert!(!view.resolve(second.ticket, Ok(page(2, &[20]))));
        assert!(view.resolve(third.ticket, Ok(page(3, &[30]))));
        assert_eq!(ids(&view), vec![30]);
    }

    #[test]
    fn stale_error_does_not_clobber_fresh_data() {
        let session = Session::anonymous();
        let mut view = ListingView::new(ListingScope::All, 10);
        let stale = fetch(Some(view.reload(&session)));
        let fresh = fetch(Some(view.reload(&session)));

        view.resolve(fresh.ticket, Ok(page(1, &[1])));
        view.resolve(stale.ticket, Err(ApiError::Network("reset".to_string())));
        assert!(view.status().error().is_none());
        assert_eq!(ids(&view), vec![1]);
    }

    #[test]
    fn navigation_is_noop_at_boundary() {
        let session = Session::anonymous();
        let mut view = ListingView::new(ListingScope::All, 10);
        let request = fetch(Some(view.reload(&session)));
        view.resolve(request.ticket, Ok(page(1, &[1])));

        assert!(view.navigate(&session, PageAction::Previous).is_none());
        assert!(view.navigate(&session, PageAction::First).is_none());
        assert_eq!(fetch(view.navigate(&session, PageAction::Last)).page, 5);
    }

    #[test]
    fn failure_surfaces_error_and_keeps_posts() {
        let session = Session::anonymous();
        let mut view = ListingView::new(ListingScope::All, 10);
        let request = fetch(Some(view.reload(&session)));
        view.resolve(request.ticket, Ok(page(1, &[1])));

        let request = fetch(view.navigate(&session, PageAction::Next));
        view.resolve(request.ticket, Err(ApiError::Network("down".to_string())));
        let error = view.status().error().expect("error must be shown");
        assert!(error.contains("down"));
        assert_eq!(ids(&view), vec![1]);
    }

    #[test]
    fn my_posts_without_token_redirect_home() {
        let mut view = ListingView::new(ListingScope::Mine, 10);
        assert_eq!(
            view.reload(&Session::anonymous()),
            ListingStep::Redirect(Route::Home)
        );

        let request = fetch(Some(view.reload(&Session::with_token("t"))));
        assert_eq!(request.scope.path(), "/api/posts/my");
    }

    #[test]
    fn open_jumps_to_requested_page() {
        let mut view = ListingView::new(ListingScope::All, 10);
        let request = fetch(Some(view.open(&Session::anonymous(), 4)));
        assert_eq!(request.page, 4);
        view.resolve(request.ticket, Ok(page(4, &[40])));
        assert_eq!(view.paginator().window(), vec![1, 2, 3, 4, 5]);
        assert_eq!(view.paginator().current_page(), 4);
    }

    #[test]
    fn page_past_the_end_follows_server_page() {
        let mut view = ListingView::new(ListingScope::All, 10);
        let request = fetch(Some(view.open(&Session::anonymous(), 99)));
        assert_eq!(request.page, 99);

        view.resolve(request.ticket, Ok(page(5, &[50])));
        assert_eq!(view.current_page(), 5);
        assert_eq!(view.paginator().current_page(), 5);
        assert!(view.navigate(&Session::anonymous(), PageAction::Last).is_none());
    }

    #[test]
    fn page_without_number_is_clamped_to_total() {
        let mut view = ListingView::new(ListingScope::All, 10);
        let request = fetch(Some(view.open(&Session::anonymous(), 99)));
        view.resolve(request.ticket, Ok(page(0, &[])));
        assert_eq!(view.current_page(), 5);
    }

    #[test]
    fn missing_total_pages_is_derived_from_total() {
        let mut view = ListingView::new(ListingScope::All, 10);
        let request = fetch(Some(view.reload(&Session::anonymous())));
        let mut response = page(1, &[1]);
        response.total = 21;
        response.total_pages = 0;
        view.resolve(request.ticket, Ok(response));
        assert_eq!(view.paginator().total_pages(), 3);
    }
}
