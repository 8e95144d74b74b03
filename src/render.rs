use crate::config::{BlockSettings, NetworkSettings, Placement};
use crate::error::Result;
use crate::networks::{Field, Network};
use askama::Template;
use std::collections::BTreeMap;
use tracing::debug;

/// Page URL and title of the request the block is rendered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub page_url: String,
    pub page_title: String,
}

impl RenderContext {
    pub fn new(page_url: impl Into<String>, page_title: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            page_title: page_title.into(),
        }
    }

    /// Resolve the context of a request.
    ///
    /// The page URL is the request host followed by its path. The title is the
    /// route title, else the title of the content item being shown, else the
    /// site name. Empty titles count as missing.
    #[must_use]
    pub fn resolve(
        host: &str,
        path: &str,
        route_title: Option<&str>,
        item_title: Option<&str>,
        site_name: &str,
    ) -> Self {
        let page_title = [route_title, item_title]
            .into_iter()
            .flatten()
            .find(|title| !title.is_empty())
            .unwrap_or(site_name);

        Self::new(format!("{host}{path}"), page_title)
    }
}

/// One rendered share icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub network: Network,
    pub href: String,
    pub hover_text: String,
    /// Horizontal and vertical class pair of the anchor
    pub classes: String,
    pub new_tab: bool,
}

/// Markup and style text of a rendered block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    pub markup: String,
    pub style: String,
}

impl RenderedBlock {
    /// The style wrapped in a `<style>` element, followed by the markup.
    #[must_use]
    pub fn fragment(&self) -> String {
        format!("<style>{}</style>{}", self.style, self.markup)
    }
}

#[derive(Template)]
#[template(path = "icons.html")]
struct IconsTemplate<'a> {
    list_class: &'a str,
    links: &'a [ShareLink],
}

#[derive(Template)]
#[template(path = "icons.css", escape = "none")]
struct IconsStyleTemplate<'a> {
    selectors: [&'a str; 2],
    icon_size_px: u32,
    font_size_px: u32,
    radius_px: u32,
    spacing_px: u32,
    icon_color: &'a str,
    link_color: &'a str,
}

/// Build the share link of a single network.
#[must_use]
pub fn share_link(network: Network, settings: &NetworkSettings, ctx: &RenderContext) -> ShareLink {
    let template = network.rules().select(|field| settings.has(field));

    ShareLink {
        network,
        href: expand(template, ctx, settings),
        hover_text: settings.hover_text.clone(),
        classes: network.css_classes(),
        new_tab: network.opens_new_tab(),
    }
}

/// Share links of every network that is not suppressed, in display order.
///
/// Vertical blocks keep the declaration order. Horizontal blocks are sorted by
/// order key; when two networks share a key, the one declared later takes the
/// slot.
#[must_use]
pub fn ordered_links(block: &BlockSettings, ctx: &RenderContext) -> Vec<ShareLink> {
    let networks = &block.networks;
    let included = Network::ALL
        .into_iter()
        .filter(|network| !networks.get(*network).suppressed);

    match block.layout.placement {
        Placement::Vertical => included
            .map(|network| share_link(network, networks.get(network), ctx))
            .collect(),
        Placement::Horizontal => {
            let mut slots: BTreeMap<u8, ShareLink> = BTreeMap::new();
            for network in included {
                let order = networks.order(network);
                let link = share_link(network, networks.get(network), ctx);
                if let Some(replaced) = slots.insert(order, link) {
                    debug!(
                        "{network} replaces {} at order {order}",
                        replaced.network
                    );
                }
            }
            slots.into_values().collect()
        }
    }
}

/// Render a block to its list markup and style text.
///
/// # Errors
///
/// Returns an error only if a template fails to format
pub fn render(block: &BlockSettings, ctx: &RenderContext) -> Result<RenderedBlock> {
    let layout = &block.layout;
    let links = ordered_links(block, ctx);
    debug!(
        "Rendering {} share icons ({}) for {}",
        links.len(),
        layout.placement,
        ctx.page_url
    );

    let list_class = match layout.placement {
        Placement::Horizontal => "soc",
        Placement::Vertical => "soc_ver",
    };
    let markup = IconsTemplate {
        list_class,
        links: &links,
    }
    .render()?;

    let style = IconsStyleTemplate {
        selectors: ["soc", "soc_ver"],
        icon_size_px: layout.icon_size_px,
        font_size_px: layout.font_size_px,
        radius_px: layout.radius_px,
        spacing_px: layout.spacing_px,
        icon_color: layout.effective_icon_color(),
        link_color: layout.effective_link_color(),
    }
    .render()?;

    Ok(RenderedBlock { markup, style })
}

/// Fill a link template in one pass; substituted values are never re-scanned.
fn expand(template: &str, ctx: &RenderContext, settings: &NetworkSettings) -> String {
    let mut out = String::with_capacity(template.len() + 2 * ctx.page_url.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        match placeholder(name, ctx, settings) {
            Some(value) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

fn placeholder<'a>(
    name: &str,
    ctx: &'a RenderContext,
    settings: &'a NetworkSettings,
) -> Option<&'a str> {
    match name {
        "page_url" => Some(&ctx.page_url),
        "page_title" => Some(&ctx.page_title),
        _ => Field::from_key(name).map(|field| settings.field(field)),
    }
}
