//! services/catalogue/src/shell.rs
//!
//! A line-oriented terminal front end. Each line is either a path to navigate to
//! or a command acting on the mounted view.

use crate::error::ClientError;
use crate::render;
use crate::router;
use crate::views::{
    AdminView, AppState, EditMovieView, GenreView, GenresView, GraphqlMovieView,
    GraphqlSearchView, LoginView, MovieView, MoviesView,
};
use async_trait::async_trait;
use catalogue_core::form::{FormAction, FormController, Prompt, SubmitOutcome};
use catalogue_core::loader::LoadOutcome;
use catalogue_core::navigation::Route;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Redirects followed for one navigation before giving up.
const MAX_REDIRECTS: usize = 4;

const HELP: &str = "\
Commands:
  /<path> | go <path>     open a page, e.g. /movies or /admin/movie/0
  set <field> <value>     edit a form field
  submit                  submit the current form
  delete                  delete the movie being edited
  search <term>           search the GraphQL page
  show                    print the current page again
  menu                    list the pages
  quit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Go(String),
    Set(String, String),
    Submit,
    Delete,
    Search(String),
    Show,
    Menu,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parses one input line; blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if line.starts_with('/') {
            return Some(Command::Go(line.to_string()));
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let command = match word {
            "go" => Command::Go(rest.to_string()),
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Command::Set(field.to_string(), value.trim().to_string())
            }
            "submit" => Command::Submit,
            "delete" => Command::Delete,
            "search" => Command::Search(rest.to_string()),
            "show" => Command::Show,
            "menu" => Command::Menu,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        };
        Some(command)
    }
}

/// Form fields are fixed by the view; the record id is never edited by hand.
fn set_known_field<A: FormAction>(form: &mut FormController<A>, field: &str, value: String) -> bool {
    if field == "id" || !form.state().fields.contains_key(field) {
        return false;
    }
    form.set_field(field, value);
    true
}

enum Mounted {
    Home,
    Movies(MoviesView),
    Movie(MovieView),
    Genres(GenresView),
    Genre(GenreView),
    Login(LoginView),
    Admin(AdminView),
    EditMovie(EditMovieView),
    Graphql(GraphqlSearchView),
    GraphqlMovie(GraphqlMovieView),
}

/// Answers a confirmation with the next input line.
struct LinePrompt<'a, R, W> {
    lines: Mutex<&'a mut Lines<R>>,
    out: std::sync::Mutex<&'a mut W>,
}

#[async_trait]
impl<'a, R, W> Prompt for LinePrompt<'a, R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    async fn confirm(&self, title: &str, message: &str) -> bool {
        if let Ok(mut out) = self.out.lock() {
            let shown = write!(out, "{}: {} [y/N] ", title, message).and_then(|_| out.flush());
            if let Err(e) = shown {
                warn!("Failed to show confirmation prompt: {}", e);
            }
        }
        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(answer)) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }
}

pub struct Shell<R, W> {
    app: Arc<AppState>,
    lines: Lines<R>,
    out: W,
    route: Route,
    mounted: Mounted,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(app: Arc<AppState>, input: R, out: W) -> Self {
        Self {
            app,
            lines: input.lines(),
            out,
            route: Route::Home,
            mounted: Mounted::Home,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Reads commands until `quit` or end of input.
    pub async fn run(&mut self) -> Result<(), ClientError> {
        self.show_menu()?;
        self.show().await?;
        while let Some(line) = self.lines.next_line().await? {
            let Some(command) = Command::parse(&line) else {
                continue;
            };
            if command == Command::Quit {
                break;
            }
            self.execute(command).await?;
        }
        info!("Shell closed");
        Ok(())
    }

    pub async fn execute(&mut self, command: Command) -> Result<(), ClientError> {
        debug!(?command, route = %self.route, "Executing command");
        match command {
            Command::Go(path) => match router::resolve(&path) {
                Some(route) => self.navigate(route).await,
                None => {
                    writeln!(self.out, "No page at {}", path)?;
                    Ok(())
                }
            },
            Command::Set(field, value) => self.set_field(field, value),
            Command::Submit => {
                let outcome = match &mut self.mounted {
                    Mounted::Login(view) => Some(view.form_mut().submit().await),
                    Mounted::EditMovie(view) => match view.form_mut() {
                        Some(form) => Some(form.submit().await),
                        None => None,
                    },
                    _ => None,
                };
                match outcome {
                    Some(outcome) => self.settle(outcome).await,
                    None => {
                        writeln!(self.out, "There is no form on this page")?;
                        Ok(())
                    }
                }
            }
            Command::Delete => self.delete().await,
            Command::Search(term) => {
                if let Mounted::Graphql(view) = &self.mounted {
                    view.search(&term).await;
                    self.show().await
                } else {
                    writeln!(self.out, "Search is only available on {}", Route::Graphql)?;
                    Ok(())
                }
            }
            Command::Show => self.show().await,
            Command::Menu => self.show_menu(),
            Command::Help => {
                write!(self.out, "{}", HELP)?;
                Ok(())
            }
            Command::Quit => Ok(()),
            Command::Unknown(line) => {
                writeln!(self.out, "Unknown command: {} (try `help`)", line)?;
                Ok(())
            }
        }
    }

    /// Mounts the view for `route`, following redirects.
    pub async fn navigate(&mut self, mut route: Route) -> Result<(), ClientError> {
        for _ in 0..MAX_REDIRECTS {
            if route == Route::Logout {
                self.app.session.clear();
                info!("Signed out");
                route = Route::Home;
                continue;
            }
            route = match (route, &self.mounted) {
                (Route::Genre { id, name }, Mounted::Genres(view)) if name.is_empty() => {
                    view.link(id).await
                }
                (route, _) => route,
            };

            let (mounted, outcome) = self.mount(&route).await;
            if let LoadOutcome::Redirect(next) = outcome {
                debug!(from = %route, to = %next, "Redirected");
                route = next;
                continue;
            }
            self.mounted = mounted;
            self.route = route;
            return self.show().await;
        }
        warn!(%route, "Too many redirects");
        writeln!(self.out, "Could not open {}", route)?;
        Ok(())
    }

    async fn mount(&self, route: &Route) -> (Mounted, LoadOutcome) {
        let app = self.app.clone();
        match route {
            Route::Home | Route::Logout => (Mounted::Home, LoadOutcome::Committed),
            Route::Movies => {
                let view = MoviesView::new(app);
                let outcome = view.mount().await;
                (Mounted::Movies(view), outcome)
            }
            Route::Movie(id) => {
                let view = MovieView::new(app);
                let outcome = view.mount(*id).await;
                (Mounted::Movie(view), outcome)
            }
            Route::Genres => {
                let view = GenresView::new(app);
                let outcome = view.mount().await;
                (Mounted::Genres(view), outcome)
            }
            Route::Genre { id, name } => {
                let view = GenreView::new(app);
                let outcome = view.mount(*id, name.clone()).await;
                (Mounted::Genre(view), outcome)
            }
            Route::Login => (Mounted::Login(LoginView::new(app)), LoadOutcome::Committed),
            Route::Admin => {
                let view = AdminView::new(app);
                let outcome = view.mount().await;
                (Mounted::Admin(view), outcome)
            }
            Route::EditMovie(id) => {
                let mut view = EditMovieView::new(app);
                let outcome = view.mount(*id).await;
                (Mounted::EditMovie(view), outcome)
            }
            Route::Graphql => {
                let view = GraphqlSearchView::new(app);
                let outcome = view.mount().await;
                (Mounted::Graphql(view), outcome)
            }
            Route::GraphqlMovie(id) => {
                let view = GraphqlMovieView::new(app);
                let outcome = view.mount(*id).await;
                (Mounted::GraphqlMovie(view), outcome)
            }
        }
    }

    fn set_field(&mut self, field: String, value: String) -> Result<(), ClientError> {
        let accepted = match &mut self.mounted {
            Mounted::Login(view) => Some(set_known_field(view.form_mut(), &field, value)),
            Mounted::EditMovie(view) => view
                .form_mut()
                .map(|form| set_known_field(form, &field, value)),
            _ => None,
        };
        match accepted {
            Some(true) => {}
            Some(false) => writeln!(self.out, "Unknown field: {}", field)?,
            None => writeln!(self.out, "There is no form on this page")?,
        }
        Ok(())
    }

    async fn delete(&mut self) -> Result<(), ClientError> {
        let Shell {
            mounted, lines, out, ..
        } = &mut *self;
        let form = match mounted {
            Mounted::EditMovie(view) => view.form_mut(),
            _ => None,
        };
        let Some(form) = form else {
            writeln!(out, "There is nothing to delete on this page")?;
            return Ok(());
        };
        let prompt = LinePrompt {
            lines: Mutex::new(lines),
            out: std::sync::Mutex::new(out),
        };
        let outcome = form.confirm_delete(&prompt).await;
        drop(prompt);
        self.settle(outcome).await
    }

    async fn settle(&mut self, outcome: SubmitOutcome) -> Result<(), ClientError> {
        match outcome {
            SubmitOutcome::Navigate(route) => self.navigate(route).await,
            SubmitOutcome::Cancelled => {
                writeln!(self.out, "Cancelled")?;
                Ok(())
            }
            SubmitOutcome::Invalid(_) | SubmitOutcome::Rejected(_) => self.show().await,
        }
    }

    async fn show(&mut self) -> Result<(), ClientError> {
        let screen = self.screen().await;
        writeln!(self.out, "\n== {} ==", self.route)?;
        write!(self.out, "{}", screen)?;
        self.out.flush()?;
        Ok(())
    }

    fn show_menu(&mut self) -> Result<(), ClientError> {
        let entries = router::menu(self.app.session.is_authenticated());
        write!(self.out, "{}", render::menu(&entries))?;
        Ok(())
    }

    async fn screen(&self) -> String {
        match &self.mounted {
            Mounted::Home => format!(
                "This is the home page of the catalogue at {}. Type `menu` to see where to go.\n",
                self.app.config.api_base_url
            ),
            Mounted::Movies(view) => render::view(&view.state().await, |movies| {
                render::movie_list("Choose a movie", movies, |m| Route::Movie(m.id))
            }),
            Mounted::Movie(view) => render::view(&view.state().await, render::movie),
            Mounted::Genres(view) => render::view(&view.state().await, |g| render::genres(g)),
            Mounted::Genre(view) => render::view(&view.state().await, render::genre),
            Mounted::Login(view) => render::login_form(view.form().state()),
            Mounted::Admin(view) => render::view(&view.state().await, |movies| {
                render::movie_list("Manage Catalogue", movies, |m| Route::EditMovie(m.id))
            }),
            Mounted::EditMovie(view) => match view.form() {
                Some(form) => render::movie_form(form.state()),
                None => render::view(&view.state().await, |_| String::new()),
            },
            Mounted::Graphql(view) => {
                render::view(&view.state().await, |movies| render::graphql_movies(movies))
            }
            Mounted::GraphqlMovie(view) => render::view(&view.state().await, render::movie),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::{app, signed_in_app, FakeApi};
    use catalogue_core::domain::Genre;

    async fn run(state: Arc<AppState>, input: &str) -> String {
        let mut shell = Shell::new(state, input.as_bytes(), Vec::new());
        shell.run().await.expect("shell runs");
        String::from_utf8(shell.output().clone()).expect("utf-8 output")
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("   "), None);
        assert_eq!(Command::parse("/movies"), Some(Command::Go("/movies".to_string())));
        assert_eq!(Command::parse("go /genres"), Some(Command::Go("/genres".to_string())));
        assert_eq!(
            Command::parse("set description A long  story"),
            Some(Command::Set("description".to_string(), "A long  story".to_string()))
        );
        assert_eq!(
            Command::parse("set title"),
            Some(Command::Set("title".to_string(), String::new()))
        );
        assert_eq!(Command::parse("search"), Some(Command::Search(String::new())));
        assert_eq!(Command::parse("exit"), Some(Command::Quit));
        assert_eq!(Command::parse("dance"), Some(Command::Unknown("dance".to_string())));
    }

    #[tokio::test]
    async fn lists_movies() {
        let api = FakeApi::default().with_movies(vec![FakeApi::movie(1, "Alien")]);
        let out = run(app(api), "/movies\n").await;
        assert!(out.contains("Choose a movie"));
        assert!(out.contains("Alien"));
        assert!(out.contains("/movies/1"));
    }

    #[tokio::test]
    async fn protected_page_lands_on_login() {
        let api = FakeApi::default();
        let calls = api.calls.clone();
        let state = app(api);
        let mut shell = Shell::new(state, "".as_bytes(), Vec::new());

        shell.navigate(Route::Admin).await.unwrap();

        assert_eq!(shell.route(), &Route::Login);
        assert_eq!(calls.total(), 0);
    }

    #[tokio::test]
    async fn login_then_admin() {
        let api = FakeApi::default().with_movies(vec![FakeApi::movie(4, "Heat")]);
        let state = app(api);
        let out = run(
            state.clone(),
            "/login\nset email admin@example.com\nset password secret\nsubmit\n",
        )
        .await;

        assert_eq!(state.session.get().as_deref(), Some("test-token"));
        assert!(out.contains("Manage Catalogue"));
        assert!(out.contains("/admin/movie/4"));
        assert!(!out.contains("secret"));
    }

    #[tokio::test]
    async fn unknown_field_is_reported() {
        let out = run(app(FakeApi::default()), "/login\nset nickname bob\n").await;
        assert!(out.contains("Unknown field: nickname"));
    }

    #[tokio::test]
    async fn delete_asks_first() {
        let api = FakeApi::default().with_movies(vec![FakeApi::movie(5, "Heat")]);
        let deleted = api.deleted.clone();
        let state = signed_in_app(api);

        let out = run(state.clone(), "/admin/movie/5\ndelete\nn\n").await;
        assert!(out.contains("Are you sure?"));
        assert!(out.contains("Cancelled"));
        assert!(deleted.lock().unwrap().is_empty());

        run(state, "/admin/movie/5\ndelete\ny\n").await;
        assert_eq!(*deleted.lock().unwrap(), vec![5]);
    }

    struct BrokenOutput;

    impl Write for BrokenOutput {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[tokio::test]
    async fn prompt_still_reads_answer_when_output_fails() {
        let mut lines = "yes\n".as_bytes().lines();
        let mut out = BrokenOutput;
        let prompt = LinePrompt {
            lines: Mutex::new(&mut lines),
            out: std::sync::Mutex::new(&mut out),
        };

        assert!(prompt.confirm("Delete movie", "Are you sure?").await);
        assert!(!prompt.confirm("Delete movie", "Are you sure?").await);
    }

    #[tokio::test]
    async fn genre_name_comes_from_listing() {
        let api = FakeApi::default().with_genres(vec![Genre {
            id: 2,
            name: "Comedy".to_string(),
        }]);
        let out = run(app(api), "/genres\n/genres/2\n").await;
        assert!(out.contains("Genre: Comedy"));
    }

    #[tokio::test]
    async fn logout_clears_session_and_goes_home() {
        let state = signed_in_app(FakeApi::default());
        let mut shell = Shell::new(state.clone(), "".as_bytes(), Vec::new());

        shell.navigate(Route::Logout).await.unwrap();

        assert_eq!(shell.route(), &Route::Home);
        assert!(!state.session.is_authenticated());
    }

    #[tokio::test]
    async fn search_outside_graphql_page_is_refused() {
        let out = run(app(FakeApi::default()), "search alien\n").await;
        assert!(out.contains("Search is only available on /graphql"));
    }
}
