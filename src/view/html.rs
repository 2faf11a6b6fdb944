use super::{CardView, DetailView, EMPTY_LIST_MESSAGE};
use crate::state::{Content, GridView, Mode, RowView, ViewState};
use anyhow::{Context, Result};
use askama::Template;

const NAV: [(&str, &str, &str); 4] = [
    ("home", "/", "Home"),
    ("trending", "/trending", "Trending"),
    ("popular", "/popular?page=1", "Popolari"),
    ("top_rated", "/top_rated?page=1", "Top rated"),
];

struct NavLink {
    href: &'static str,
    label: &'static str,
    active: bool,
}

struct CardLink<'a> {
    href: String,
    view: &'a CardView,
}

struct Pager {
    page: u32,
    total_pages: u32,
    prev: Option<String>,
    next: Option<String>,
}

struct TrailerLink<'a> {
    key: &'a str,
    open: bool,
    toggle_href: String,
    embed_src: String,
}

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    nav: Vec<NavLink>,
    last_query: &'a str,
    status: &'a str,
    grid: Option<GridTemplate<'a>>,
    rows: Vec<RowTemplate<'a>>,
    modal: Option<ModalTemplate<'a>>,
}

#[derive(Template)]
#[template(path = "partials/grid.html")]
struct GridTemplate<'a> {
    cards: Vec<CardLink<'a>>,
    empty_message: &'static str,
    pager: Option<Pager>,
}

#[derive(Template)]
#[template(path = "partials/row.html")]
struct RowTemplate<'a> {
    title: &'static str,
    more_href: String,
    cards: Vec<CardLink<'a>>,
    empty_message: &'static str,
}

#[derive(Template)]
#[template(path = "partials/modal.html")]
struct ModalTemplate<'a> {
    detail: &'a DetailView,
    close_href: String,
    trailer: Option<TrailerLink<'a>>,
}

/// Full HTML document for a state. Rendering depends on nothing else.
pub fn render_page(state: &ViewState) -> Result<String> {
    let mode = &state.mode;
    let (grid, rows) = match &state.content {
        Content::Idle => (None, Vec::new()),
        Content::Grid(grid) => (Some(grid_template(mode, grid)), Vec::new()),
        Content::Rows(rows) => (None, rows.iter().map(|r| row_template(mode, r)).collect()),
    };
    let page = PageTemplate {
        nav: NAV
            .iter()
            .map(|&(key, href, label)| NavLink {
                href,
                label,
                active: key == mode.nav_key(),
            })
            .collect(),
        last_query: &state.last_query,
        status: &state.status,
        grid,
        rows,
        modal: state.detail.as_ref().map(|d| modal_template(mode, d)),
    };
    page.render().context("failed to render page")
}

fn card_links<'a>(mode: &Mode, cards: &'a [CardView]) -> Vec<CardLink<'a>> {
    cards
        .iter()
        .map(|view| CardLink {
            href: detail_href(view.id, mode, false),
            view,
        })
        .collect()
}

fn grid_template<'a>(mode: &Mode, grid: &'a GridView) -> GridTemplate<'a> {
    let pager = mode.page().map(|_| Pager {
        page: grid.page,
        total_pages: grid.total_pages,
        prev: (grid.page > 1).then(|| mode.with_page(grid.page - 1).path()),
        next: (grid.page < grid.total_pages).then(|| mode.with_page(grid.page + 1).path()),
    });
    GridTemplate {
        cards: card_links(mode, &grid.cards),
        empty_message: EMPTY_LIST_MESSAGE,
        pager,
    }
}

fn row_template<'a>(mode: &Mode, row: &'a RowView) -> RowTemplate<'a> {
    RowTemplate {
        title: row.title,
        more_href: row.more.path(),
        cards: card_links(mode, &row.cards),
        empty_message: EMPTY_LIST_MESSAGE,
    }
}

fn modal_template<'a>(mode: &Mode, detail: &'a DetailView) -> ModalTemplate<'a> {
    ModalTemplate {
        detail,
        close_href: mode.path(),
        trailer: detail.trailer.as_ref().map(|trailer| TrailerLink {
            key: &trailer.key,
            open: trailer.open,
            toggle_href: detail_href(detail.id, mode, !trailer.open),
            embed_src: trailer.embed_src(),
        }),
    }
}

/// Link that opens the detail modal over `mode`, optionally with the trailer playing.
fn detail_href(movie_id: u64, mode: &Mode, trailer_open: bool) -> String {
    let mut href = format!(
        "/movie/{movie_id}?back={}",
        urlencoding::encode(&mode.path())
    );
    if trailer_open {
        href.push_str("&trailer=1");
    }
    href
}
