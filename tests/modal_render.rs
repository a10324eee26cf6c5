use chrono::NaiveDate;
use insta::assert_snapshot;
use portal_core::api::{InMemoryDirectory, RecordingNotifier};
use portal_core::modal::{ModalConfig, ModalHost, ModalIcon, WizardModal};
use portal_core::portal::CustomerForm;
use portal_core::ui::layout::{layout_for, CompactLayout, ViewportClass, WideLayout};
use portal_core::ui::variant::ButtonVariant;

const COMPACT: CompactLayout = CompactLayout { colored: false };

fn customer_modal(host: &mut ModalHost) -> WizardModal<CustomerForm> {
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let mut modal = WizardModal::new(CustomerForm::new(today)).unwrap();
    modal.open(host).unwrap();
    modal
}

#[test]
fn compact_layout_on_open() {
    let mut host = ModalHost::new();
    let modal = customer_modal(&mut host);
    let lines = modal.render(&host, &COMPACT).unwrap();
    assert_snapshot!(lines.join("\n"), @r###"
(+) Add Customer  [x]
--------------------------------
Step 1 of 3: Personal details
Full Name*:
Email*:
Phone*:
Date of Birth:
--------------------------------
[ Next ]
( Cancel )
"###);
}

#[test]
fn compact_layout_after_blocked_next() {
    let mut host = ModalHost::new();
    let mut modal = customer_modal(&mut host);
    modal.confirm(&mut host).unwrap();
    let lines = modal.render(&host, &COMPACT).unwrap();
    assert_snapshot!(lines.join("\n"), @r###"
(+) Add Customer  [x]
--------------------------------
Step 1 of 3: Personal details
Full Name*:
  ! Full name is required
Email*:
  ! Email is required
Phone*:
  ! Phone is required
Date of Birth:
--------------------------------
[ Next (disabled) ]
( Cancel )
"###);
}

#[test]
fn failure_banner_sits_above_the_final_step() {
    let mut host = ModalHost::new();
    let mut directory = InMemoryDirectory::new();
    directory.fail_next("Service unavailable");
    let mut notifier = RecordingNotifier::new();
    let mut modal = customer_modal(&mut host);
    for (field, value) in [
        ("full_name", "Ada Lovelace"),
        ("email", "ada@example.com"),
        ("phone", "3125551234"),
    ] {
        modal.input(&mut host, field, value).unwrap();
    }
    modal.confirm(&mut host).unwrap();
    for (field, value) in [
        ("street", "1 Main St"),
        ("city", "Springfield"),
        ("state", "IL"),
        ("zip", "62701"),
    ] {
        modal.input(&mut host, field, value).unwrap();
    }
    modal.confirm(&mut host).unwrap();
    modal.input(&mut host, "preferred_contact", "email").unwrap();
    modal
        .confirm_with(&mut host, &mut directory, &mut notifier)
        .unwrap();

    let lines = modal.render(&host, &COMPACT).unwrap();
    assert_snapshot!(lines.join("\n"), @r###"
(+) Add Customer  [x]
--------------------------------
! Service unavailable
Step 3 of 3: Preferences
Preferred Contact: Email
Notes:
--------------------------------
[ Create Customer ]
( Cancel )
"###);
}

#[test]
fn wide_layout_boxes_a_confirmation_dialog() {
    let mut host = ModalHost::new();
    let handle = host.open(
        ModalConfig::new("Delete doctor")
            .with_icon(ModalIcon::Danger)
            .with_footer("Keep", "Delete")
            .with_confirm_variant(ButtonVariant::Danger),
    );
    host.set_body(handle, vec!["Remove Dr. Rivera?".to_string()])
        .unwrap();
    let layout = WideLayout {
        width: 30,
        colored: false,
    };
    let lines = host.render(handle, &layout).unwrap();
    assert_snapshot!(lines.join("\n"), @r###"
+--------------------------------+
| (x) Delete doctor          [x] |
+--------------------------------+
| Remove Dr. Rivera?             |
+--------------------------------+
|           ( Keep )  [ Delete ] |
+--------------------------------+
"###);
}

#[test]
fn wide_rows_share_one_width() {
    let mut host = ModalHost::new();
    let mut modal = customer_modal(&mut host);
    modal.confirm(&mut host).unwrap();
    let layout = layout_for(ViewportClass::for_width(120, 80), 48, false);
    let lines = modal.render(&host, layout.as_ref()).unwrap();
    assert!(lines.iter().all(|line| line.chars().count() == 52));
    assert!(lines
        .iter()
        .any(|line| line.contains("( Cancel )  [ Next (disabled) ]")));
}

#[test]
fn secrets_are_masked_in_the_body() {
    let mut host = ModalHost::new();
    let mut modal = WizardModal::new(portal_core::portal::DoctorForm).unwrap();
    modal.open(&mut host).unwrap();
    modal.input(&mut host, "password", "hunter22").unwrap();
    let lines = modal.render(&host, &COMPACT).unwrap();
    assert!(lines.contains(&"Password*: ********".to_string()));
    assert!(!lines.iter().any(|line| line.contains("hunter22")));
}
