use super::*;
use crate::state::fake_prefs::{FixedColorScheme, MemoryPreferences};
use crate::util::fake_surface::FakeSurface;

// =============================================================
// Helpers
// =============================================================

type TestController = ThemeController<MemoryPreferences, FixedColorScheme>;

fn controller(prefs: &MemoryPreferences, os_dark: bool) -> TestController {
    controller_on(prefs, os_dark, SignalBus::new())
}

fn controller_on(prefs: &MemoryPreferences, os_dark: bool, bus: SignalBus) -> TestController {
    ThemeController::new(prefs.clone(), FixedColorScheme::new(os_dark), &ThemeConfig::default(), bus)
}

fn stored(prefs: &MemoryPreferences) -> Option<String> {
    prefs.read("theme")
}

// =============================================================
// ThemeSetting
// =============================================================

#[test]
fn theme_setting_default_is_system() {
    assert_eq!(ThemeSetting::default(), ThemeSetting::System);
}

#[test]
fn theme_setting_parse_is_exact() {
    assert_eq!(ThemeSetting::parse("dark"), Some(ThemeSetting::Dark));
    assert_eq!(ThemeSetting::parse("light"), Some(ThemeSetting::Light));
    assert_eq!(ThemeSetting::parse("system"), Some(ThemeSetting::System));
    assert_eq!(ThemeSetting::parse("Dark"), None);
    assert_eq!(ThemeSetting::parse(""), None);
}

#[test]
fn theme_setting_serde_uses_lowercase() {
    assert_eq!(serde_json::to_string(&ThemeSetting::System).unwrap(), "\"system\"");
    let parsed: ThemeSetting = serde_json::from_str("\"light\"").unwrap();
    assert_eq!(parsed, ThemeSetting::Light);
}

// =============================================================
// resolve_setting precedence
// =============================================================

#[test]
fn stored_dark_wins_over_light_os() {
    assert_eq!(resolve_setting(Some("dark"), false), ThemeSetting::Dark);
}

#[test]
fn stored_light_wins_over_dark_os() {
    assert_eq!(resolve_setting(Some("light"), true), ThemeSetting::Light);
}

#[test]
fn absent_with_dark_os_is_dark() {
    assert_eq!(resolve_setting(None, true), ThemeSetting::Dark);
}

#[test]
fn absent_with_light_os_is_system_not_light() {
    assert_eq!(resolve_setting(None, false), ThemeSetting::System);
}

#[test]
fn stored_system_stays_system_regardless_of_os() {
    assert_eq!(resolve_setting(Some("system"), true), ThemeSetting::System);
    assert_eq!(resolve_setting(Some("system"), false), ThemeSetting::System);
}

#[test]
fn malformed_stored_value_is_system() {
    assert_eq!(resolve_setting(Some("purple"), true), ThemeSetting::System);
    assert_eq!(resolve_setting(Some(""), false), ThemeSetting::System);
}

// =============================================================
// EffectiveTheme
// =============================================================

#[test]
fn effective_theme_follows_os_only_for_system() {
    assert!(EffectiveTheme::resolve(ThemeSetting::Dark, false).is_dark());
    assert!(!EffectiveTheme::resolve(ThemeSetting::Light, true).is_dark());
    assert!(EffectiveTheme::resolve(ThemeSetting::System, true).is_dark());
    assert!(!EffectiveTheme::resolve(ThemeSetting::System, false).is_dark());
}

// =============================================================
// ThemeController
// =============================================================

#[test]
fn no_stored_theme_with_dark_os_applies_dark_class() {
    let mut ctl = controller(&MemoryPreferences::default(), true);
    let mut surface = FakeSurface::default();

    let setting = ctl.get_theme();
    assert_eq!(setting, ThemeSetting::Dark);

    ctl.update_theme(setting, &mut surface);
    assert!(surface.dark);
}

#[test]
fn update_theme_persists_setting_verbatim() {
    let prefs = MemoryPreferences::default();
    let mut ctl = controller(&prefs, true);
    let mut surface = FakeSurface::default();

    ctl.update_theme(ThemeSetting::System, &mut surface);

    assert_eq!(stored(&prefs).as_deref(), Some("system"));
    assert!(surface.dark);
}

#[test]
fn update_theme_light_removes_dark_class() {
    let mut ctl = controller(&MemoryPreferences::default(), false);
    let mut surface = FakeSurface::default();
    surface.dark = true;

    let effective = ctl.update_theme(ThemeSetting::Light, &mut surface);

    assert_eq!(effective, EffectiveTheme::Light);
    assert!(!surface.dark);
}

#[test]
fn get_theme_after_update_follows_precedence() {
    for os_dark in [false, true] {
        let mut ctl = controller(&MemoryPreferences::default(), os_dark);
        let mut surface = FakeSurface::default();

        ctl.update_theme(ThemeSetting::Light, &mut surface);
        assert_eq!(ctl.get_theme(), ThemeSetting::Light);

        ctl.update_theme(ThemeSetting::Dark, &mut surface);
        assert_eq!(ctl.get_theme(), ThemeSetting::Dark);

        // Once stored, `system` is never promoted by the OS signal.
        ctl.update_theme(ThemeSetting::System, &mut surface);
        assert_eq!(ctl.get_theme(), ThemeSetting::System);
    }
}

#[test]
fn custom_storage_key_resolves_through_recorded_key() {
    let prefs = MemoryPreferences::default();
    let config = ThemeConfig {
        storage_key: "site-theme".to_owned(),
        ..ThemeConfig::default()
    };
    let mut ctl = ThemeController::new(prefs.clone(), FixedColorScheme::new(true), &config, SignalBus::new());
    crate::config::remember_storage_key(&config.storage_key);

    ctl.update_theme(ThemeSetting::Light, &mut FakeSurface::default());

    let key = crate::config::theme_storage_key();
    assert_eq!(resolve_setting(prefs.read(&key).as_deref(), true), ThemeSetting::Light);
    assert_eq!(prefs.read("theme"), None);
}

#[test]
fn update_theme_rewrites_captcha_frames_once() {
    let mut ctl = controller(&MemoryPreferences::with("theme", "light"), false);
    let mut surface = FakeSurface::with_frames(&["https://x/recaptcha/api2/anchor?k=1&theme=light"]);

    ctl.update_theme(ThemeSetting::Dark, &mut surface);

    assert_eq!(surface.src(0), "https://x/recaptcha/api2/anchor?k=1&theme=dark");
    assert_eq!(surface.frames[0].assigned, 1);
}

#[test]
fn update_theme_broadcasts_preference_changed() {
    let bus = SignalBus::new();
    let mut ctl = controller_on(&MemoryPreferences::default(), false, bus.clone());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    bus.subscribe(SignalKind::PreferenceChanged, move |signal| sink.borrow_mut().push(signal.clone()));

    ctl.update_theme(ThemeSetting::Dark, &mut FakeSurface::default());

    assert_eq!(*seen.borrow(), vec![UiSignal::PreferenceChanged(ThemeSetting::Dark)]);
}

#[test]
fn os_change_reapplies_only_when_stored_system() {
    let mut ctl = controller(&MemoryPreferences::with("theme", "system"), false);
    let mut surface = FakeSurface::default();
    ctl.update_theme(ThemeSetting::System, &mut surface);
    assert!(!surface.dark);

    ctl.scheme().set(true);
    let applied = ctl.os_theme_changed(&mut surface);

    assert_eq!(applied, Some(EffectiveTheme::Dark));
    assert!(surface.dark);
}

#[test]
fn os_change_ignored_for_explicit_setting() {
    let mut ctl = controller(&MemoryPreferences::with("theme", "light"), false);
    let mut surface = FakeSurface::default();

    ctl.scheme().set(true);
    assert_eq!(ctl.os_theme_changed(&mut surface), None);
    assert!(!surface.dark);
}

#[test]
fn os_change_ignored_when_nothing_stored() {
    let prefs = MemoryPreferences::default();
    let mut ctl = controller(&prefs, false);
    let mut surface = FakeSurface::default();

    ctl.scheme().set(true);
    assert_eq!(ctl.os_theme_changed(&mut surface), None);
    assert_eq!(stored(&prefs), None);
}

#[test]
fn os_change_broadcasts_os_signal() {
    let bus = SignalBus::new();
    let mut ctl = controller_on(&MemoryPreferences::default(), false, bus.clone());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    bus.subscribe(SignalKind::OsThemeChanged, move |signal| sink.borrow_mut().push(signal.clone()));

    ctl.scheme().set(true);
    ctl.os_theme_changed(&mut FakeSurface::default());

    assert_eq!(*seen.borrow(), vec![UiSignal::OsThemeChanged { dark: true }]);
}

// =============================================================
// CaptchaSync
// =============================================================

#[test]
fn captcha_sync_follows_preference_changes() {
    let bus = SignalBus::new();
    let sync = Rc::new(CaptchaSync::new(
        FakeSurface::with_frames(&["https://h/hcaptcha?sitekey=1"]),
        FixedColorScheme::new(true),
        vec![CaptchaProvider::hcaptcha()],
    ));
    Rc::clone(&sync).attach(&bus);

    bus.emit(&UiSignal::PreferenceChanged(ThemeSetting::System));

    sync.with_surface(|surface| {
        assert_eq!(surface.src(0), "https://h/hcaptcha?sitekey=1&theme=dark");
        assert_eq!(surface.frames[0].replaced, 1);
    });
}

#[test]
fn captcha_sync_ignores_other_signals() {
    let sync = CaptchaSync::new(
        FakeSurface::with_frames(&["https://x/recaptcha/api2/anchor?k=1"]),
        FixedColorScheme::new(false),
        vec![CaptchaProvider::recaptcha()],
    );
    assert_eq!(sync.handle(&UiSignal::FiltersCleared), 0);
    assert_eq!(sync.handle(&UiSignal::OsThemeChanged { dark: true }), 0);
}
