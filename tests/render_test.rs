use share_icons::config::{BlockSettings, NetworkSettings, Placement};
use share_icons::networks::{Field, Network};
use share_icons::render::{ordered_links, render, share_link, RenderContext};

fn ctx() -> RenderContext {
    RenderContext::new("example.com/page", "My Page")
}

fn only(included: &[Network], placement: Placement) -> BlockSettings {
    let mut block = BlockSettings::default();
    block.layout.placement = placement;
    for network in Network::ALL {
        block.networks.get_mut(network).suppressed = !included.contains(&network);
    }
    block
}

/// Networks in the order their anchors appear in the markup
fn rendered_order(markup: &str) -> Vec<Network> {
    let mut found: Vec<(usize, Network)> = Network::ALL
        .into_iter()
        .filter_map(|network| {
            let class = format!("class=\"{}\"", network.css_classes());
            markup.find(&class).map(|pos| (pos, network))
        })
        .collect();
    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, network)| network).collect()
}

fn href(network: Network, settings: &NetworkSettings) -> String {
    share_link(network, settings, &ctx()).href
}

#[test]
fn test_suppressed_networks_never_render() {
    let mut block = BlockSettings::default();
    block.networks.tumblr.suppressed = true;
    block.networks.email.suppressed = true;

    for placement in [Placement::Horizontal, Placement::Vertical] {
        block.layout.placement = placement;
        let rendered = render(&block, &ctx()).expect("block renders");
        assert!(!rendered.markup.contains("soc-tumblr"));
        assert!(!rendered.markup.contains("soc-email1"));
        assert_eq!(rendered.markup.matches("<li>").count(), 7);
    }
}

#[test]
fn test_included_networks_render_exactly_once() {
    let rendered = render(&BlockSettings::default(), &ctx()).expect("block renders");
    for network in Network::ALL {
        let class = format!("class=\"{}\"", network.css_classes());
        assert_eq!(rendered.markup.matches(&class).count(), 1, "{network}");
    }
}

#[test]
fn test_list_class_follows_placement() {
    let horizontal = render(&only(&[Network::Reddit], Placement::Horizontal), &ctx())
        .expect("block renders");
    assert!(horizontal.markup.starts_with("<ul class=\"soc\">"));

    let vertical = render(&only(&[Network::Reddit], Placement::Vertical), &ctx())
        .expect("block renders");
    assert!(vertical.markup.starts_with("<ul class=\"soc_ver\">"));
}

#[test]
fn test_vertical_ignores_order_keys() {
    let mut block = BlockSettings::default();
    block.layout.placement = Placement::Vertical;
    for network in Network::ALL {
        block.networks.get_mut(network).order = Some(10 - network.default_order());
    }

    let rendered = render(&block, &ctx()).expect("block renders");
    assert_eq!(rendered_order(&rendered.markup), Network::ALL.to_vec());
}

#[test]
fn test_horizontal_sorts_by_order_key() {
    let mut block = BlockSettings::default();
    for network in Network::ALL {
        block.networks.get_mut(network).order = Some(10 - network.default_order());
    }

    let rendered = render(&block, &ctx()).expect("block renders");
    let mut reversed = Network::ALL.to_vec();
    reversed.reverse();
    assert_eq!(rendered_order(&rendered.markup), reversed);
}

#[test]
fn test_horizontal_reddit_then_facebook() {
    let mut block = only(&[Network::Reddit, Network::Facebook], Placement::Horizontal);
    block.networks.reddit.order = Some(1);
    block.networks.facebook.order = Some(2);

    let rendered = render(&block, &ctx()).expect("block renders");
    assert_eq!(
        rendered_order(&rendered.markup),
        vec![Network::Reddit, Network::Facebook]
    );
}

#[test]
fn test_horizontal_duplicate_order_keeps_later_network() {
    let mut block = BlockSettings::default();
    block.networks.facebook.order = Some(1);

    let links = ordered_links(&block, &ctx());
    let networks: Vec<Network> = links.iter().map(|link| link.network).collect();
    assert_eq!(networks.len(), 8);
    assert_eq!(networks[0], Network::Facebook);
    assert!(!networks.contains(&Network::Reddit));
}

#[test]
fn test_suppressed_network_does_not_take_a_slot() {
    let mut block = BlockSettings::default();
    block.networks.facebook.order = Some(1);
    block.networks.facebook.suppressed = true;

    let links = ordered_links(&block, &ctx());
    assert_eq!(links[0].network, Network::Reddit);
    assert_eq!(links.len(), 8);
}

#[test]
fn test_default_style_forces_colors() {
    let mut block = BlockSettings::default();
    block.layout.icon_color = "#000000".to_string();
    block.layout.link_color = "#ff0000".to_string();

    let rendered = render(&block, &ctx()).expect("block renders");
    assert!(rendered.style.contains("  color: #ffffff !important;"));
    assert!(rendered.style.contains("background-color: none !important;"));
    assert!(!rendered.style.contains("#ff0000"));

    block.layout.use_default_style = false;
    let rendered = render(&block, &ctx()).expect("block renders");
    assert!(rendered.style.contains("  color: #000000 !important;"));
    assert!(rendered.style.contains("background-color: #ff0000 !important;"));
}

#[test]
fn test_style_applies_dimensions_to_both_lists() {
    let mut block = BlockSettings::default();
    block.layout.icon_size_px = 40;
    block.layout.font_size_px = 20;
    block.layout.radius_px = 5;
    block.layout.spacing_px = 3;

    let style = render(&block, &ctx()).expect("block renders").style;
    assert!(style.contains(".soc li a {"));
    assert!(style.contains(".soc_ver li a {"));
    assert_eq!(style.matches("width: 40px;").count(), 2);
    assert_eq!(style.matches("line-height: 40px;").count(), 2);
    assert_eq!(style.matches("font-size: 20px;").count(), 2);
    assert_eq!(style.matches(" border-radius: 5px;").count(), 2);
    assert_eq!(style.matches("margin-right: 3px;").count(), 2);
}

/// Asserts the href of `network` for each `(first, second, expected)` case,
/// where the two values fill the given override fields.
fn assert_shapes(network: Network, fields: [Field; 2], cases: &[(&str, &str, String)]) {
    for (first, second, expected) in cases {
        let mut settings = NetworkSettings::default();
        settings.set_field(fields[0], (*first).to_string());
        settings.set_field(fields[1], (*second).to_string());
        assert_eq!(&href(network, &settings), expected, "{network} {first:?} {second:?}");
    }
}

#[test]
fn test_reddit_shapes() {
    let base = "http://www.reddit.com/submit";
    assert_shapes(
        Network::Reddit,
        [Field::Url, Field::Title],
        &[
            ("", "", format!("{base}?url=example.com/page&title=My Page")),
            ("example.org/post", "", format!("{base}?url=example.org/post&title=My Page")),
            ("", "Custom", format!("{base}?url=example.com/page&title=Custom")),
            ("example.org/post", "Custom", format!("{base}?url=example.org/post&title=Custom")),
        ],
    );
}

#[test]
fn test_tumblr_shapes() {
    let base = "http://www.tumblr.com/share?v=3";
    assert_shapes(
        Network::Tumblr,
        [Field::Url, Field::Title],
        &[
            ("", "", format!("{base}&u=example.com/page&t=My Page")),
            ("example.org/post", "", format!("{base}&u=example.org/post&t=My Page")),
            ("", "Custom", format!("{base}&u=example.com/page&t=Custom")),
            ("example.org/post", "Custom", format!("{base}&u=example.org/post&t=Custom")),
        ],
    );
}

#[test]
fn test_stumbleupon_shapes() {
    let base = "http://www.stumbleupon.com/submit";
    assert_shapes(
        Network::StumbleUpon,
        [Field::Url, Field::Title],
        &[
            ("", "", format!("{base}?url=example.com/page&title=My Page")),
            ("example.org/post", "", format!("{base}?url=example.org/post&title=My Page")),
            ("", "Custom", format!("{base}?url=example.com/page&title=Custom")),
            ("example.org/post", "Custom", format!("{base}?url=example.org/post&title=Custom")),
        ],
    );
}

#[test]
fn test_twitter_via() {
    let with_via = NetworkSettings {
        via: "rustlang".to_string(),
        ..NetworkSettings::default()
    };
    assert_eq!(
        href(Network::Twitter, &with_via),
        "https://twitter.com/intent/tweet?source=example.com/page&text=My Page:example.com/page&via=@rustlang"
    );
    assert_eq!(
        href(Network::Twitter, &NetworkSettings::default()),
        "https://twitter.com/intent/tweet?source=example.com/page&text=My Page:example.com/page&via="
    );
}

#[test]
fn test_pinterest_shapes() {
    let base = "https://pinterest.com/pin/create/button/?url=example.com/page";
    let cases = [
        ("", "", format!("{base}&media=&description=")),
        ("img.png", "", format!("{base}&media=img.png&description=")),
        ("", "Nice", format!("{base}&media=&description=Nice")),
        ("img.png", "Nice", format!("{base}&media=img.png&description=Nice")),
    ];

    for (image_url, description, expected) in cases {
        let settings = NetworkSettings {
            image_url: image_url.to_string(),
            description: description.to_string(),
            ..NetworkSettings::default()
        };
        assert_eq!(href(Network::Pinterest, &settings), expected);
    }
}

#[test]
fn test_linkedin_shapes() {
    let base = "https://www.linkedin.com/shareArticle?mini=true&url=example.com/page&title=My Page";
    assert_shapes(
        Network::LinkedIn,
        [Field::Source, Field::Summary],
        &[
            ("", "", format!("{base}&source=&summary=")),
            ("Blog", "", format!("{base}&source=Blog&summary=")),
            ("", "Short", format!("{base}&source=&summary=Short")),
            ("Blog", "Short", format!("{base}&source=Blog&summary=Short")),
        ],
    );
}

#[test]
fn test_email_shapes() {
    assert_shapes(
        Network::Email,
        [Field::Subject, Field::Body],
        &[
            ("", "", "mailto:?&subject=&body=example.com/page".to_string()),
            ("Hi", "", "mailto:?&subject=Hi&body=example.com/page".to_string()),
            ("", "Read this", "mailto:?&subject=&body=Read this example.com/page".to_string()),
            ("Hi", "Read this", "mailto:?&subject=Hi&body=Read this example.com/page".to_string()),
        ],
    );

    let settings = NetworkSettings {
        subject: "Hi".to_string(),
        ..NetworkSettings::default()
    };
    assert!(!share_link(Network::Email, &settings, &ctx()).new_tab);
}

#[test]
fn test_google_plus_shares_page_url() {
    assert_eq!(
        href(Network::GooglePlus, &NetworkSettings::default()),
        "https://plus.google.com/share?url=example.com/page"
    );
}

#[test]
fn test_markup_escapes_hover_text() {
    let mut block = only(&[Network::Facebook], Placement::Horizontal);
    block.networks.facebook.hover_text = "<b>share</b>".to_string();

    let markup = render(&block, &ctx()).expect("block renders").markup;
    assert!(!markup.contains("<b>"));
    assert!(markup.contains("&lt;b&gt;share"));
}

#[test]
fn test_email_anchor_stays_in_tab() {
    let block = only(&[Network::Email, Network::Facebook], Placement::Vertical);
    let markup = render(&block, &ctx()).expect("block renders").markup;

    let email = markup
        .split("<li>")
        .find(|item| item.contains("soc-email1"))
        .expect("email item rendered");
    assert!(!email.contains("target=\"_blank\""));

    let facebook = markup
        .split("<li>")
        .find(|item| item.contains("soc-facebook"))
        .expect("facebook item rendered");
    assert!(facebook.contains("target=\"_blank\""));
}
