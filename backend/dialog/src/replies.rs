//! Fixed user-facing sentences. Internal failures are only ever reported to
//! the caller through one of these.

pub const GREETING: &str =
    "Привет! Я твой учитель английского. Задавай вопрос — отвечу коротко.";

pub const GREETING_BUTTONS: &[&str] = &["Викторина", "Как по-английски кошка?", "Помощь"];

pub const ASK_FOR_INPUT: &str = "Скажи вопрос про английский — отвечу в двух предложениях.";

pub const DIDNT_HEAR: &str = "Повтори, пожалуйста.";

pub const APOLOGY: &str = "Техническая заминка. Скажи ещё раз покороче.";

pub const THINKING: &str = "Секунду, я ещё думаю. Скажи «продолжи», и я отвечу.";

pub const STILL_WORKING: &str = "Ещё думаю. Скажи «продолжи» через пару секунд.";

pub const NOTHING_PENDING: &str = "Мне пока нечего продолжать. Задай вопрос про английский!";

pub const CONTINUE_BUTTON: &str = "Продолжи";

pub const GOODBYE: &str = "Пока! Возвращайся учить английский.";

pub const HELP: &str = "Я отвечаю на вопросы про английский. Скажи «как по-английски кошка», \
«викторина» или просто задай вопрос. Чтобы закончить, скажи «стоп».";
