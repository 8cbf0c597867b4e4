mod logging;
mod render;
mod settings;
mod token_store;

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, anyhow, bail};
use blog_client::{ApiError, BlogClient, BlogClientError};
use blog_core::views::{
    CommentsView, EditorLoad, EditorMode, EditorSubmit, ListingScope, ListingStep, ListingView,
    PostDetailView, PostEditorView,
};
use blog_core::{Route, Session, TokenStore, gravatar_url};
use clap::{Parser, Subcommand};

use settings::{Settings, normalize_server};
use token_store::FileTokenStore;

#[derive(Debug, Parser)]
#[command(name = "blog-cli", version, about = "CLI клиент для блога")]
struct Cli {
    /// Адрес API (по умолчанию BLOG_API_URL или http://127.0.0.1:5150).
    #[arg(long, global = true)]
    server: Option<String>,

    /// Подробные логи (уровень debug) в stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Вход пользователя.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Выход: удаляет сохранённый токен.
    Logout,
    /// Текущий пользователь.
    Whoami,
    /// Лента постов.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Мои посты (требует токен).
    Mine {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Пост с обсуждением.
    Show {
        #[arg(long)]
        id: i64,
    },
    /// Комментарий к посту (требует токен).
    Comment {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        content: String,
        /// Ответ на комментарий с этим id.
        #[arg(long)]
        reply_to: Option<i64>,
    },
    /// Создание поста (требует токен).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        summary: String,
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        /// Файл с markdown-содержимым.
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long)]
        published: bool,
    },
    /// Обновление поста (требует токен).
    ///
    /// Не указанные поля сохраняют текущие значения поста.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
        #[arg(long)]
        published: Option<bool>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let settings = Settings::from_env().context("invalid configuration")?;
    logging::init_logging(&settings.log_level, cli.verbose)?;

    let server = normalize_server(cli.server.unwrap_or_else(|| settings.api_url.clone()));
    let store = FileTokenStore::new(&settings.token_file);
    let mut client = BlogClient::new(server).context("failed to build http client")?;
    if let Some(token) = Session::restore(&store).token() {
        client.set_token(token);
    }

    match cli.command {
        Command::Login { email, password } => {
            let login = client
                .login(&email, &password)
                .await
                .map_err(map_client_error)?;
            store
                .save(&login.token)
                .context("failed to persist token")?;
            match login.name {
                Some(name) => println!("Logged in as {name}"),
                None => println!("Logged in"),
            }
        }
        Command::Logout => {
            client.logout();
            store.clear().context("failed to remove token")?;
            println!("Logged out");
        }
        Command::Whoami => match refresh_user(&mut client, &store).await {
            Some(user) => {
                println!("{} <{}> (pid={})", user.name, user.email, user.pid);
                println!("Avatar: {}", gravatar_url(&user.email, 80));
            }
            None => println!("Not logged in"),
        },
        Command::List { page } => {
            show_listing(&client, ListingScope::All, page, settings.page_size).await?;
        }
        Command::Mine { page } => {
            show_listing(&client, ListingScope::Mine, page, settings.page_size).await?;
        }
        Command::Show { id } => show_post(&mut client, &store, id).await?,
        Command::Comment {
            post_id,
            content,
            reply_to,
        } => post_comment(&client, post_id, content, reply_to).await?,
        Command::Create {
            title,
            summary,
            content,
            content_file,
            published,
        } => {
            let content = read_content(content, content_file)?
                .ok_or_else(|| anyhow!("--content or --content-file is required"))?;
            let mut editor = PostEditorView::new(EditorMode::New);
            let form = editor.form_mut();
            form.title = title;
            form.summary = summary;
            form.content = content;
            form.published = published;
            save_post(&client, editor).await?;
        }
        Command::Update {
            id,
            title,
            summary,
            content,
            content_file,
            published,
        } => {
            let content = read_content(content, content_file)?;
            let mut editor = PostEditorView::new(EditorMode::Edit(id));
            match editor.load(client.session()) {
                EditorLoad::Fetch { ticket, post_id } => {
                    let result = client.get_post(post_id).await.map_err(ApiError::from);
                    editor.resolve_load(ticket, result);
                }
                EditorLoad::Redirect(route) => return Err(login_required(route)),
                EditorLoad::Ready => {}
            }
            if let Some(error) = editor.status().error() {
                bail!("{error}");
            }

            let form = editor.form_mut();
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(summary) = summary {
                form.summary = summary;
            }
            if let Some(content) = content {
                form.content = content;
            }
            if let Some(published) = published {
                form.published = published;
            }
            save_post(&client, editor).await?;
        }
    }

    Ok(())
}

/// Проверяет токен; отвергнутый токен молча удаляется.
async fn refresh_user(
    client: &mut BlogClient,
    store: &FileTokenStore,
) -> Option<blog_client::CurrentUser> {
    client.get_token()?;
    match client.current_user().await {
        Ok(user) => Some(user),
        Err(err) => {
            tracing::info!(error = %err, "dropping stored token");
            if let Err(err) = store.clear() {
                tracing::warn!(error = %err, "failed to remove token file");
            }
            None
        }
    }
}

async fn show_listing(
    client: &BlogClient,
    scope: ListingScope,
    page: u32,
    page_size: u32,
) -> Result<()> {
    let mut view = ListingView::new(scope, page_size);
    match view.open(client.session(), page) {
        ListingStep::Fetch(request) => {
            let result = client.fetch_page(&request).await.map_err(ApiError::from);
            view.resolve(request.ticket, result);
        }
        ListingStep::Redirect(route) => return Err(login_required(route)),
    }

    if let Some(error) = view.status().error() {
        bail!("{error}");
    }
    print!("{}", render::format_listing(&view));
    Ok(())
}

async fn show_post(client: &mut BlogClient, store: &FileTokenStore, id: i64) -> Result<()> {
    let mut detail = PostDetailView::new(id);
    let ticket = detail.load();
    let result = client.get_post(id).await.map_err(ApiError::from);
    detail.resolve_post(ticket, result, client.session());
    if let Some(error) = detail.status().error() {
        bail!("{error}");
    }

    if detail.needs_current_user(client.session()) {
        refresh_user(client, store).await;
        detail.resolve_author(client.session());
    }

    let mut comments = CommentsView::new(id);
    load_comments(client, &mut comments).await;

    print!("{}", render::format_post(&detail));
    println!();
    if let Some(error) = comments.status().error() {
        println!("{error}");
    } else {
        print!("{}", render::format_comments(comments.forest()));
    }
    Ok(())
}

async fn load_comments(client: &BlogClient, view: &mut CommentsView) {
    let ticket = view.load();
    let result = client
        .list_comments(view.post_id())
        .await
        .map_err(ApiError::from);
    view.resolve(ticket, result);
}

async fn post_comment(
    client: &BlogClient,
    post_id: i64,
    content: String,
    reply_to: Option<i64>,
) -> Result<()> {
    let mut view = CommentsView::new(post_id);
    view.composer_mut().set_draft(content);
    if let Some(parent_id) = reply_to {
        view.composer_mut().reply_to(parent_id);
    }

    let Some(body) = view.submit(client.session()) else {
        bail!(
            "{}",
            view.status().error().unwrap_or("comment was not submitted")
        );
    };

    let result = client.create_comment(&body).await.map_err(ApiError::from);
    if !view.resolve_submit(result) {
        bail!(
            "{}",
            view.status().error().unwrap_or("failed to post comment")
        );
    }

    load_comments(client, &mut view).await;
    println!("Comment posted");
    print!("{}", render::format_comments(view.forest()));
    Ok(())
}

async fn save_post(client: &BlogClient, mut editor: PostEditorView) -> Result<()> {
    let result = match editor.submit(client.session()) {
        EditorSubmit::Create(form) => client.create_post(&form).await,
        EditorSubmit::Update(id, form) => client.update_post(id, &form).await,
        EditorSubmit::Redirect(route) => return Err(login_required(route)),
        EditorSubmit::Rejected => bail!(
            "{}",
            editor.status().error().unwrap_or("post was not submitted")
        ),
    };

    let saved = result.as_ref().ok().map(|post| (post.id, post.title.clone()));
    match editor.resolve_submit(result.map_err(ApiError::from)) {
        Some(Route::Dashboard) => {
            if let Some((id, title)) = saved {
                println!("Saved post [{id}] {title}");
            }
            println!("See your posts with `blog-cli mine`");
            Ok(())
        }
        Some(route) => {
            println!("Saved, continue at {}", route.path());
            Ok(())
        }
        None => bail!(
            "{}",
            editor.status().error().unwrap_or("failed to save post")
        ),
    }
}

fn read_content(content: Option<String>, content_file: Option<PathBuf>) -> Result<Option<String>> {
    match (content, content_file) {
        (Some(content), _) => Ok(Some(content)),
        (None, Some(path)) => fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))
            .map(Some),
        (None, None) => Ok(None),
    }
}

fn login_required(route: Route) -> anyhow::Error {
    tracing::debug!(redirect = %route.path(), "credential required");
    anyhow!("authorization required: run `blog-cli login --email ... --password ...`")
}

fn map_client_error(err: BlogClientError) -> anyhow::Error {
    let message = match err {
        BlogClientError::Unauthorized => "invalid email or password".to_string(),
        BlogClientError::MissingCredential => {
            "authorization required: run `blog-cli login ...`".to_string()
        }
        BlogClientError::NotFound => "resource not found".to_string(),
        BlogClientError::Rejected { message, .. } => format!("request rejected: {message}"),
        BlogClientError::Decode(message) => format!("unexpected server response: {message}"),
        BlogClientError::Http(err) => format!("network error: {err}"),
    };
    anyhow!(message)
}
