mod dispatcher;
mod email;
mod sms;
mod template;

pub use self::dispatcher::{NotificationDispatcher, NotificationDispatcherDeps};
pub use self::email::{SmtpChannel, SmtpSettings};
pub use self::sms::{SmsChannel, SmsSettings};
pub use self::template::{
    MessageKind, MessageTemplates, TemplateContext, format_amount, render_template,
};
