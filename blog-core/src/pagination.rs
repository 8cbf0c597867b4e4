//! Окно номеров страниц и состояние кнопок навигации.
//!
//! Все входные значения зажимаются в допустимый диапазон, ошибок нет.

/// Сколько номеров страниц показывается одновременно.
pub const MAX_VISIBLE_PAGES: u32 = 5;

/// Размер страницы по умолчанию.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Количество страниц для `total_items` элементов, не меньше 1.
pub fn total_pages(total_items: u64, page_size: u32) -> u32 {
    let pages = total_items.div_ceil(u64::from(page_size.max(1)));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

/// Зажимает номер страницы в `[1, total_pages]`.
pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

/// Возвращает окно видимых номеров страниц.
///
/// Окно длиной `min(max_visible, total_pages)` центрируется на текущей
/// странице, а у границ сдвигается так, чтобы оставаться полным.
pub fn compute_window(current_page: u32, total_pages: u32, max_visible: u32) -> Vec<u32> {
    let total_pages = total_pages.max(1);
    let max_visible = max_visible.max(1);
    let current_page = clamp_page(current_page, total_pages);

    let mut start = current_page.saturating_sub(max_visible / 2).max(1);
    let end = total_pages.min(start.saturating_add(max_visible - 1));
    if end - start + 1 < max_visible {
        start = (end + 1).saturating_sub(max_visible).max(1);
    }

    (start..=end).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Запрос смены страницы от элементов управления.
pub enum PageAction {
    /// Первая страница.
    First,
    /// Предыдущая страница.
    Previous,
    /// Следующая страница.
    Next,
    /// Последняя страница.
    Last,
    /// Конкретный номер из окна.
    Goto(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Какие кнопки навигации активны.
pub struct NavControls {
    /// «В начало».
    pub first: bool,
    /// «Назад».
    pub previous: bool,
    /// «Вперёд».
    pub next: bool,
    /// «В конец».
    pub last: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Состояние пагинации списка.
pub struct Paginator {
    current_page: u32,
    total_pages: u32,
    max_visible: u32,
}

impl Paginator {
    /// Создаёт пагинатор, зажимая входные значения.
    pub fn new(current_page: u32, total_pages: u32, max_visible: u32) -> Self {
        let total_pages = total_pages.max(1);
        Self {
            current_page: clamp_page(current_page, total_pages),
            total_pages,
            max_visible: max_visible.max(1),
        }
    }

    /// Текущая страница.
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Общее количество страниц.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Видимые номера страниц.
    pub fn window(&self) -> Vec<u32> {
        compute_window(self.current_page, self.total_pages, self.max_visible)
    }

    /// Состояние кнопок first/previous/next/last.
    pub fn controls(&self) -> NavControls {
        let at_start = self.current_page == 1;
        let at_end = self.current_page == self.total_pages;
        NavControls {
            first: !at_start,
            previous: !at_start,
            next: !at_end,
            last: !at_end,
        }
    }

    /// Целевая страница для действия или `None`, если кнопка неактивна.
    pub fn navigate(&self, action: PageAction) -> Option<u32> {
        let target = match action {
            PageAction::First => 1,
            PageAction::Previous => self.current_page.saturating_sub(1),
            PageAction::Next => self.current_page.saturating_add(1),
            PageAction::Last => self.total_pages,
            PageAction::Goto(page) => page,
        };
        let target = clamp_page(target, self.total_pages);
        (target != self.current_page).then_some(target)
    }
}
