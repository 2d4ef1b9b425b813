use crate::config::Settings;
use crate::core::{
    AnalyzedSegment, MetadataCache, MetadataService, ReviewStore, SegmentAnalyzer, Sentiment,
    Summary, TranscriptService, backfill_title, extract_video_id, format_timestamp, summarize,
    top_keywords_for,
};
use crate::error::Result;
use crate::tui::components::{ContentViewer, InputField, ProductEntry, ProductList, ProgressBar};
use crate::tui::events::AppEvent;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

const KEYWORD_CHART_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Home,
    NewAnalysis,
    Processing { video_id: String },
    Dashboard,
    Segments,
    Viewer,
}

/// Everything the dashboard screen renders for the current product
/// filter, recomputed from the store on demand.
pub struct DashboardData {
    pub summary: Summary,
    pub positive_keywords: Vec<(String, usize)>,
    pub negative_keywords: Vec<(String, usize)>,
    pub segments: Vec<AnalyzedSegment>,
}

pub struct App {
    pub state: AppState,
    pub should_quit: bool,

    // Home screen
    pub selected_option: usize,

    // New analysis screen
    pub url_input: InputField,
    pub product_input: InputField,
    pub languages_input: InputField,
    pub input_focus: usize,

    // Dashboard screen
    pub product_list: ProductList,
    pub dashboard: Option<DashboardData>,
    pub status_message: Option<String>,

    // Segments / viewer screens
    pub content_viewer: Option<ContentViewer>,
    pub viewer_height: u16,

    // Processing screen
    pub progress_bar: ProgressBar,
    last_analyzed_product: Option<String>,

    // Services
    pub transcript_service: TranscriptService,
    pub metadata_service: MetadataService,
    pub analyzer: SegmentAnalyzer,
    pub store: ReviewStore,
    pub languages: Vec<String>,

    // Async communication
    pub processing_tx: Option<mpsc::UnboundedSender<String>>,
    pub processing_rx: Option<mpsc::UnboundedReceiver<String>>,
}

impl App {
    pub fn new(settings: &Settings) -> Result<Self> {
        let transcript_service = TranscriptService::new()?;
        let metadata_service =
            MetadataService::new(settings.api_key.clone(), MetadataCache::default());
        let analyzer = SegmentAnalyzer::new();
        let store = ReviewStore::new(settings.store_path.clone());

        let mut app = Self {
            state: AppState::Home,
            should_quit: false,

            selected_option: 0,

            url_input: InputField::new("Video URL", "https://youtu.be/..."),
            product_input: InputField::new("Product Name", "e.g. Widget Pro"),
            languages_input: InputField::new("Languages", "en,es"),
            input_focus: 0,

            product_list: ProductList::new(Vec::new()),
            dashboard: None,
            status_message: None,

            content_viewer: None,
            viewer_height: 0,
            progress_bar: ProgressBar::new(),
            last_analyzed_product: None,

            transcript_service,
            metadata_service,
            analyzer,
            store,
            languages: settings.languages.clone(),

            processing_tx: None,
            processing_rx: None,
        };

        app.refresh_products();
        Ok(app)
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Key(key) => {
                self.handle_key(key)?;
            }
            AppEvent::Mouse(mouse) => {
                self.handle_mouse(mouse);
            }
            AppEvent::Tick => {
                self.handle_tick()?;
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match &self.state {
            AppState::Home => self.handle_home_key(key),
            AppState::NewAnalysis => self.handle_new_analysis_key(key),
            AppState::Processing { .. } => self.handle_processing_key(key),
            AppState::Dashboard => self.handle_dashboard_key(key),
            AppState::Segments => self.handle_segments_key(key),
            AppState::Viewer => self.handle_viewer_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Up => {
                if self.selected_option > 0 {
                    self.selected_option -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_option < 3 {
                    self.selected_option += 1;
                }
            }
            KeyCode::Char('1') => self.selected_option = 0,
            KeyCode::Char('2') => self.selected_option = 1,
            KeyCode::Char('3') => self.selected_option = 2,
            KeyCode::Char('4') => self.selected_option = 3,
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Enter => match self.selected_option {
                0 => {
                    self.status_message = None;
                    self.url_input.clear();
                    self.product_input.clear();
                    self.languages_input.value = self.languages.join(",");
                    self.set_input_focus(0);
                    self.state = AppState::NewAnalysis;
                }
                1 => {
                    self.refresh_products();
                    self.refresh_dashboard();
                    self.state = AppState::Dashboard;
                }
                2 => {
                    self.refresh_products();
                    self.refresh_dashboard();
                    self.open_segments();
                }
                3 => {
                    self.should_quit = true;
                }
                _ => {}
            },
            _ => {}
        }
        Ok(())
    }

    fn handle_new_analysis_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.state = AppState::Home;
            }
            KeyCode::Tab => {
                self.cycle_input_focus();
            }
            KeyCode::Enter => {
                if self.input_focus < 2 {
                    self.cycle_input_focus();
                } else {
                    self.start_processing();
                }
            }
            _ => {
                match self.input_focus {
                    0 => self.url_input.handle_key(key),
                    1 => self.product_input.handle_key(key),
                    _ => self.languages_input.handle_key(key),
                };
            }
        }
        Ok(())
    }

    fn handle_processing_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Esc {
            // Leaves the background task running; its messages are
            // drained and ignored once the screen is gone.
            self.state = AppState::NewAnalysis;
            self.progress_bar.reset();
        }
        Ok(())
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.state = AppState::Home;
            }
            KeyCode::Enter => {
                self.open_segments();
            }
            KeyCode::Char('s') => {
                self.open_summary_viewer();
            }
            KeyCode::Char('r') => {
                self.refresh_products();
                self.refresh_dashboard();
            }
            _ => {
                if self.product_list.handle_key(key) {
                    self.refresh_dashboard();
                }
            }
        }
        Ok(())
    }

    fn handle_segments_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.state = AppState::Dashboard;
            }
            _ => {
                if let Some(viewer) = &mut self.content_viewer {
                    viewer.handle_key(key, self.viewer_height as usize);
                }
            }
        }
        Ok(())
    }

    fn handle_viewer_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.state = AppState::Dashboard;
            }
            _ => {
                if let Some(viewer) = &mut self.content_viewer {
                    viewer.handle_key(key, self.viewer_height as usize);
                }
            }
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.state == AppState::Dashboard && self.product_list.handle_mouse(mouse) {
            self.refresh_dashboard();
        }
    }

    fn handle_tick(&mut self) -> Result<()> {
        let mut messages = Vec::new();
        if let Some(rx) = &mut self.processing_rx {
            while let Ok(message) = rx.try_recv() {
                messages.push(message);
            }
        }

        for message in messages {
            if message.starts_with("PROGRESS:") {
                if let Ok(progress) = message.trim_start_matches("PROGRESS:").parse::<f64>() {
                    self.progress_bar.set_progress(progress);
                }
            } else if message.starts_with("STATUS:") {
                let status = message.trim_start_matches("STATUS:").to_string();
                self.progress_bar.set_message(status);
            } else if message.starts_with("LOG:") {
                let log = message.trim_start_matches("LOG:").to_string();
                self.progress_bar.add_log(log);
            } else if message == "COMPLETE" {
                self.refresh_products();
                if let Some(product) = self.last_analyzed_product.take() {
                    self.product_list.select_product(&product);
                }
                self.refresh_dashboard();
                if matches!(self.state, AppState::Processing { .. }) {
                    self.state = AppState::Dashboard;
                }
                self.progress_bar.reset();
            }
        }
        Ok(())
    }

    fn set_input_focus(&mut self, focus: usize) {
        self.input_focus = focus;
        self.url_input.focused = focus == 0;
        self.product_input.focused = focus == 1;
        self.languages_input.focused = focus == 2;
    }

    fn cycle_input_focus(&mut self) {
        self.set_input_focus((self.input_focus + 1) % 3);
    }

    fn start_processing(&mut self) {
        if !self.url_input.is_valid() || !self.product_input.is_valid() {
            self.status_message =
                Some("Please enter both a video URL and a product name.".to_string());
            return;
        }

        let video_url = self.url_input.value.trim().to_string();
        let product = self.product_input.value.trim().to_string();
        let languages = crate::config::parse_languages(&self.languages_input.value);
        let languages = if languages.is_empty() {
            self.languages.clone()
        } else {
            languages
        };

        match extract_video_id(&video_url) {
            Ok(video_id) => {
                self.status_message = None;
                self.last_analyzed_product = Some(product.clone());
                self.progress_bar.reset();
                self.progress_bar.set_message("Starting...".to_string());
                self.state = AppState::Processing { video_id };

                if let Some(tx) = &self.processing_tx {
                    self.start_background_run(video_url, product, languages, tx.clone());
                }
            }
            Err(e) => {
                self.status_message = Some(e.to_string());
            }
        }
    }

    fn start_background_run(
        &self,
        video_url: String,
        product: String,
        languages: Vec<String>,
        tx: mpsc::UnboundedSender<String>,
    ) {
        let transcript_service = self.transcript_service.clone();
        let metadata_service = self.metadata_service.clone();
        let analyzer = self.analyzer;
        let store = self.store.clone();

        tokio::spawn(async move {
            let _ = tx.send("STATUS:Fetching transcript...".to_string());
            let _ = tx.send("PROGRESS:0.1".to_string());
            let _ = tx.send(format!("LOG:Fetching transcript for {video_url}"));

            let segments = match transcript_service.fetch(&video_url, &languages).await {
                Ok(segments) => segments,
                Err(e) => {
                    let _ = tx.send(format!("LOG:{e}"));
                    let _ = tx.send("STATUS:Transcript fetch failed".to_string());
                    let _ = tx.send("COMPLETE".to_string());
                    return;
                }
            };

            let _ = tx.send(format!("LOG:Fetched {} segments", segments.len()));
            let _ = tx.send("STATUS:Analyzing segments...".to_string());
            let _ = tx.send("PROGRESS:0.4".to_string());

            let mut analyzed = Vec::with_capacity(segments.len());
            let step = (segments.len() / 10).max(1);
            for (i, segment) in segments.iter().enumerate() {
                analyzed.push(analyzer.analyze(segment, &product, &video_url));
                if (i + 1) % step == 0 {
                    let fraction = (i + 1) as f64 / segments.len() as f64;
                    let _ = tx.send(format!("PROGRESS:{}", 0.4 + 0.3 * fraction));
                }
            }

            let _ = tx.send("STATUS:Fetching video details...".to_string());
            let _ = tx.send("PROGRESS:0.75".to_string());
            match metadata_service.fetch(&video_url).await {
                Ok(details) => {
                    backfill_title(&mut analyzed, &details.title);
                    let _ = tx.send(format!(
                        "LOG:Video: {} ({} views, engagement {:.1}%)",
                        details.title, details.views, details.engagement_rate
                    ));
                }
                Err(e) => {
                    // Analyses are kept; titles stay "N/A".
                    let _ = tx.send(format!("LOG:Could not fetch video details: {e}"));
                }
            }

            let _ = tx.send("STATUS:Saving analysis...".to_string());
            let _ = tx.send("PROGRESS:0.9".to_string());
            match store.append(&analyzed) {
                Ok(()) => {
                    let summary = summarize(&analyzed);
                    let _ = tx.send(format!(
                        "LOG:Saved {} segments; overall sentiment {}",
                        summary.total_segments, summary.overall_sentiment
                    ));
                    let _ = tx.send("PROGRESS:1.0".to_string());
                    let _ = tx.send("STATUS:Completed".to_string());
                }
                Err(e) => {
                    let _ = tx.send(format!("LOG:{e}"));
                    let _ = tx.send("STATUS:Error saving analysis".to_string());
                }
            }
            let _ = tx.send("COMPLETE".to_string());
        });
    }

    fn refresh_products(&mut self) {
        let all = match self.store.load_all() {
            Ok(all) => {
                self.status_message = None;
                all
            }
            Err(e) => {
                self.status_message = Some(e.to_string());
                Vec::new()
            }
        };

        let mut counts: Vec<(String, usize)> = Vec::new();
        for segment in &all {
            match counts
                .iter_mut()
                .find(|(name, _)| *name == segment.product_name)
            {
                Some((_, count)) => *count += 1,
                None => counts.push((segment.product_name.clone(), 1)),
            }
        }
        counts.sort_by(|a, b| a.0.cmp(&b.0));

        let mut entries = vec![ProductEntry {
            name: None,
            segment_count: all.len(),
        }];
        entries.extend(counts.into_iter().map(|(name, segment_count)| ProductEntry {
            name: Some(name),
            segment_count,
        }));

        self.product_list.update_items(entries);
    }

    pub fn refresh_dashboard(&mut self) {
        let filter = self.product_list.selected_filter();
        let segments = match &filter {
            Some(product) => self.store.load_for_product(product),
            None => self.store.load_all(),
        };

        let segments = match segments {
            Ok(segments) => segments,
            Err(e) => {
                self.status_message = Some(e.to_string());
                Vec::new()
            }
        };

        self.dashboard = Some(DashboardData {
            summary: summarize(&segments),
            positive_keywords: top_keywords_for(
                &segments,
                Sentiment::Positive,
                KEYWORD_CHART_LIMIT,
            ),
            negative_keywords: top_keywords_for(
                &segments,
                Sentiment::Negative,
                KEYWORD_CHART_LIMIT,
            ),
            segments,
        });
    }

    pub fn current_filter_label(&self) -> String {
        self.product_list
            .selected_filter()
            .unwrap_or_else(|| "All Products".to_string())
    }

    fn open_segments(&mut self) {
        if self.dashboard.is_none() {
            self.refresh_dashboard();
        }
        let Some(dashboard) = &self.dashboard else {
            return;
        };

        let title = format!(
            "Segments: {} ({})",
            self.current_filter_label(),
            dashboard.segments.len()
        );
        self.content_viewer = Some(ContentViewer::new(
            render_segments_text(&dashboard.segments),
            title,
        ));
        self.state = AppState::Segments;
    }

    fn open_summary_viewer(&mut self) {
        if self.dashboard.is_none() {
            self.refresh_dashboard();
        }
        let Some(dashboard) = &self.dashboard else {
            return;
        };

        let title = format!("Summary: {}", self.current_filter_label());
        self.content_viewer = Some(ContentViewer::new(
            dashboard.summary.summary_text.clone(),
            title,
        ));
        self.state = AppState::Viewer;
    }
}

fn render_segments_text(segments: &[AnalyzedSegment]) -> String {
    if segments.is_empty() {
        return "No product reviews analyzed yet.".to_string();
    }

    let options = textwrap::Options::new(96).subsequent_indent("    ");
    let mut out = String::new();
    for segment in segments {
        let line = format!(
            "[{} - {}] ({}) {}",
            format_timestamp(segment.start_time),
            format_timestamp(segment.end_time),
            segment.sentiment,
            segment.text
        );
        out.push_str(&textwrap::fill(&line, &options));
        out.push('\n');
    }
    out
}
