//! CAPTCHA iframe theme propagation.
//!
//! CAPTCHA widgets render inside third-party iframes, so the site theme can
//! only reach them through the iframe `src`: the `theme` query parameter is
//! rewritten and the frame is reloaded. Providers differ in how they react to
//! a `src` change, which is captured by [`ReloadStrategy`].

#[cfg(test)]
#[path = "captcha_test.rs"]
mod captcha_test;

use serde::{Deserialize, Serialize};

use crate::state::theme::EffectiveTheme;

const THEME_PARAM: &str = "&theme=";

/// How a rewritten iframe is made to pick up its new `src`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReloadStrategy {
    /// Reassign the `src` attribute in place.
    #[default]
    AssignSrc,
    /// Deep-clone the iframe with the new `src` and swap it into the parent.
    /// Needed for providers that ignore in-place `src` mutation.
    ReplaceNode,
}

/// A CAPTCHA provider whose iframes are matched by a `src` substring.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptchaProvider {
    pub name: String,
    pub src_marker: String,
    #[serde(default)]
    pub reload: ReloadStrategy,
}

impl CaptchaProvider {
    pub fn new(name: &str, src_marker: &str, reload: ReloadStrategy) -> Self {
        Self {
            name: name.to_owned(),
            src_marker: src_marker.to_owned(),
            reload,
        }
    }

    pub fn recaptcha() -> Self {
        Self::new("recaptcha", "recaptcha", ReloadStrategy::AssignSrc)
    }

    pub fn hcaptcha() -> Self {
        Self::new("hcaptcha", "hcaptcha", ReloadStrategy::ReplaceNode)
    }

    /// CSS selector for this provider's iframes.
    pub fn selector(&self) -> String {
        format!("iframe[src*=\"{}\"]", self.src_marker)
    }
}

/// Rewrite the `theme` query parameter of a CAPTCHA iframe `src`.
///
/// When `&theme=` is already present, the first `&theme=light` or
/// `&theme=dark` occurrence is replaced; any other value is left untouched.
/// Otherwise `&theme=<value>` is appended.
pub fn rewrite_theme_param(src: &str, theme: EffectiveTheme) -> String {
    if !src.contains(THEME_PARAM) {
        return format!("{src}{THEME_PARAM}{}", theme.as_str());
    }

    let first_match = ["light", "dark"]
        .iter()
        .filter_map(|value| {
            let needle = format!("{THEME_PARAM}{value}");
            src.find(&needle).map(|at| (at, needle.len()))
        })
        .min_by_key(|(at, _)| *at);

    match first_match {
        Some((at, len)) => {
            let mut out = String::with_capacity(src.len() + 1);
            out.push_str(&src[..at]);
            out.push_str(THEME_PARAM);
            out.push_str(theme.as_str());
            out.push_str(&src[at + len..]);
            out
        }
        None => src.to_owned(),
    }
}

/// The document surface a theme is rendered onto.
///
/// The browser implementation wraps the live document; tests use an
/// in-memory fake.
pub trait ThemeSurface {
    type Frame: PartialEq;

    /// Add or remove the dark styling class on the document root.
    fn set_dark_class(&mut self, dark: bool);

    /// All iframes matched by `provider`'s selector.
    fn captcha_frames(&self, provider: &CaptchaProvider) -> Vec<Self::Frame>;

    fn frame_src(&self, frame: &Self::Frame) -> String;

    fn assign_src(&mut self, frame: &Self::Frame, src: &str);

    /// Detach `frame` and insert a clone carrying `src` in its place.
    fn replace_frame(&mut self, frame: &Self::Frame, src: &str);
}

struct Claim<'p, F> {
    frame: F,
    src: String,
    provider: &'p CaptchaProvider,
    marker_at: usize,
}

/// Push `theme` into every CAPTCHA iframe. Returns the number of frames
/// reloaded.
///
/// A frame matched by several providers (hCaptcha URLs carry
/// `recaptchacompat=`) is reloaded once, by the provider whose marker occurs
/// earliest in its `src`.
pub fn sync_captcha_frames<S: ThemeSurface>(
    surface: &mut S,
    providers: &[CaptchaProvider],
    theme: EffectiveTheme,
) -> usize {
    let mut claims: Vec<Claim<'_, S::Frame>> = Vec::new();
    for provider in providers {
        for frame in surface.captcha_frames(provider) {
            let src = surface.frame_src(&frame);
            let Some(marker_at) = src.find(&provider.src_marker) else {
                continue;
            };
            match claims.iter_mut().find(|c| c.frame == frame) {
                Some(claim) if marker_at < claim.marker_at => {
                    claim.provider = provider;
                    claim.marker_at = marker_at;
                }
                Some(_) => {}
                None => claims.push(Claim {
                    frame,
                    src,
                    provider,
                    marker_at,
                }),
            }
        }
    }

    for claim in &claims {
        let src = rewrite_theme_param(&claim.src, theme);
        match claim.provider.reload {
            ReloadStrategy::AssignSrc => surface.assign_src(&claim.frame, &src),
            ReloadStrategy::ReplaceNode => surface.replace_frame(&claim.frame, &src),
        }
        log::debug!("captcha theme {} applied to {} frame", theme.as_str(), claim.provider.name);
    }
    claims.len()
}
