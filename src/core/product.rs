//! Xcode product types and per-target product descriptions.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The kind of product an Xcode target builds.
///
/// Serialized with the Xcode product type identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProductType {
    #[serde(rename = "com.apple.product-type.application")]
    Application,
    #[serde(rename = "com.apple.product-type.application.on-demand-install-capable")]
    OnDemandInstallCapableApplication,
    #[serde(rename = "com.apple.product-type.framework")]
    Framework,
    #[serde(rename = "com.apple.product-type.framework.static")]
    StaticFramework,
    #[serde(rename = "com.apple.product-type.library.static")]
    StaticLibrary,
    #[serde(rename = "com.apple.product-type.library.dynamic")]
    DynamicLibrary,
    #[serde(rename = "com.apple.product-type.bundle")]
    Bundle,
    #[serde(rename = "com.apple.product-type.bundle.unit-test")]
    UnitTestBundle,
    #[serde(rename = "com.apple.product-type.bundle.ui-testing")]
    UiTestBundle,
    #[serde(rename = "com.apple.product-type.app-extension")]
    AppExtension,
    #[serde(rename = "com.apple.product-type.extensionkit-extension")]
    ExtensionKitExtension,
    #[serde(rename = "com.apple.product-type.tv-app-extension")]
    TvExtension,
    #[serde(rename = "com.apple.product-type.tool")]
    CommandLineTool,
    #[serde(rename = "com.apple.product-type.application.watchapp2")]
    WatchApp,
    #[serde(rename = "com.apple.product-type.application.watchapp2-container")]
    WatchAppContainer,
    #[serde(rename = "com.apple.product-type.watchkit2-extension")]
    WatchExtension,
    #[serde(rename = "com.apple.product-type.application.messages")]
    MessagesApplication,
    #[serde(rename = "com.apple.product-type.app-extension.messages")]
    MessagesExtension,
    #[serde(rename = "com.apple.product-type.app-extension.messages-sticker-pack")]
    StickerPack,
    #[serde(rename = "com.apple.product-type.xpc-service")]
    XpcService,
    #[serde(rename = "com.apple.product-type.app-extension.intents-service")]
    IntentsServiceExtension,
}

impl ProductType {
    /// Short user-facing name, used as a target name distinguisher.
    pub fn pretty_name(&self) -> &'static str {
        match self {
            ProductType::Application => "App",
            ProductType::OnDemandInstallCapableApplication => "App Clip",
            ProductType::Framework => "Framework",
            ProductType::StaticFramework => "Static Framework",
            ProductType::StaticLibrary => "Library",
            ProductType::DynamicLibrary => "Dynamic Library",
            ProductType::Bundle => "Resource Bundle",
            ProductType::UnitTestBundle => "Unit Tests",
            ProductType::UiTestBundle => "UI Tests",
            ProductType::AppExtension => "App Extension",
            ProductType::ExtensionKitExtension => "ExtensionKit Extension",
            ProductType::TvExtension => "TV App Extension",
            ProductType::CommandLineTool => "Command Line Tool",
            ProductType::WatchApp => "Watch App",
            ProductType::WatchAppContainer => "Watch App Container",
            ProductType::WatchExtension => "WatchKit Extension",
            ProductType::MessagesApplication => "iMessage App",
            ProductType::MessagesExtension => "iMessage Extension",
            ProductType::StickerPack => "Sticker Pack",
            ProductType::XpcService => "XPC Service",
            ProductType::IntentsServiceExtension => "Intents Extension",
        }
    }

    pub fn is_test_bundle(&self) -> bool {
        matches!(self, ProductType::UnitTestBundle | ProductType::UiTestBundle)
    }

    /// Whether the product can be run and profiled directly.
    pub fn is_launchable(&self) -> bool {
        matches!(
            self,
            ProductType::Application
                | ProductType::OnDemandInstallCapableApplication
                | ProductType::CommandLineTool
                | ProductType::WatchApp
                | ProductType::WatchAppContainer
                | ProductType::MessagesApplication
        )
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pretty_name())
    }
}

/// What a single configured target produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub path: PathBuf,
    #[serde(default)]
    pub additional_paths: Vec<PathBuf>,
}

impl Product {
    /// Last path component of the product, e.g. `Foo.app`.
    pub fn basename(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    pub fn all_paths(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.path.as_path()).chain(self.additional_paths.iter().map(PathBuf::as_path))
    }
}
