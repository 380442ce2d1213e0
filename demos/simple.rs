use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;
use trellis::*;

// Define a small widget toolkit

struct Button {
    id: &'static str,
    text: &'static str,
}

impl Widget for Button {
    fn id(&self) -> Option<&str> {
        Some(self.id)
    }
}

struct Label {
    id: Option<&'static str>,
    text: Mutex<String>,
}

impl Label {
    fn set_text(&self, text: impl Into<String>) {
        if let Ok(mut current) = self.text.lock() {
            *current = text.into();
        }
    }
}

impl Widget for Label {
    fn id(&self) -> Option<&str> {
        self.id
    }
}

struct VBox {
    id: Option<&'static str>,
    children: Vec<WidgetRef>,
}

impl Widget for VBox {
    fn id(&self) -> Option<&str> {
        self.id
    }

    fn children(&self) -> &[WidgetRef] {
        &self.children
    }
}

fn label(id: Option<&'static str>, text: &str) -> WidgetRef {
    Arc::new(Label {
        id,
        text: Mutex::new(text.to_string()),
    })
}

// Views build their own component tree

struct MainView {
    children: Vec<WidgetRef>,
}

impl Widget for MainView {
    fn children(&self) -> &[WidgetRef] {
        &self.children
    }
}

impl View for MainView {
    fn create() -> anyhow::Result<Self> {
        let nav = VBox {
            id: Some("nav"),
            children: vec![
                Arc::new(Button { id: "overview", text: "Overview" }),
                Arc::new(Button { id: "settings", text: "Settings" }),
            ],
        };
        Ok(MainView {
            children: vec![Arc::new(nav), label(Some("status"), "")],
        })
    }
}

// Services

#[derive(Default)]
struct LocaleService;

impl LocaleService {
    fn greeting(&self) -> &'static str {
        "Welcome"
    }
}

impl Bean for LocaleService {
    fn descriptor() -> Descriptor<Self> {
        Descriptor::<Self>::from_default()
    }
}

#[derive(Default)]
struct SettingsService {
    locale: Slot<Arc<LocaleService>>,
}

impl Bean for SettingsService {
    fn descriptor() -> Descriptor<Self> {
        Descriptor::<Self>::from_default()
            .service::<LocaleService>("locale", |s| &mut s.locale)
    }
}

// Controllers, registered at link time in this module's namespace

#[derive(Default)]
struct MainController {
    settings: Slot<Arc<SettingsService>>,
    view: Slot<Arc<MainView>>,
    status: Slot<Arc<Label>>,
    nav: Slot<Vec<Arc<Button>>>,
    labels: Slot<HashMap<String, Arc<Label>>>,
}

impl MainController {
    fn show_status(&mut self) -> anyhow::Result<()> {
        let (Some(settings), Some(status)) = (self.settings.get(), self.status.get()) else {
            anyhow::bail!("controller is not wired");
        };
        if let Some(locale) = settings.locale.get() {
            status.set_text(locale.greeting());
        }
        Ok(())
    }
}

impl Bean for MainController {
    fn descriptor() -> Descriptor<Self> {
        Descriptor::<Self>::from_default()
            .service::<SettingsService>("settings", |c| &mut c.settings)
            .view::<MainView>("view", |c| &mut c.view)
            .control::<Label>("status", |c| &mut c.status)
            .controls::<Button>("nav", |c| &mut c.nav)
            .control_map::<Label>("labels", |c| &mut c.labels)
            .post_construct("show_status", MainController::show_status)
    }
}

impl Controller for MainController {
    type View = MainView;

    fn view(&self) -> Option<Arc<MainView>> {
        self.view.get().cloned()
    }
}

register_controller!(MainController);

fn main() -> Result<(), WiringError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut trellis = Trellis::new();
    let report = trellis.scan(module_path!())?;
    println!("{report:?}");

    if let Some(controller) = trellis.get_bean::<MainController>() {
        for button in controller.nav.get().into_iter().flatten() {
            println!("nav: {} ({})", button.text, button.id);
        }
        if let Some(labels) = controller.labels.get() {
            println!("labels: {:?}", labels.keys().collect::<Vec<_>>());
        }
        if let Some(status) = controller.status.get() {
            if let Ok(text) = status.text.lock() {
                println!("status: {text}");
            }
        }
    }

    Ok(())
}
