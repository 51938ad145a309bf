use std::collections::HashMap;

pub struct I18n {
    translations: HashMap<String, HashMap<String, String>>,
    current_lang: String,
}

impl I18n {
    pub fn new(lang: &str) -> Self {
        let mut translations = HashMap::new();

        // English
        let mut en = HashMap::new();
        // Help texts
        en.insert("help_about".to_string(), "Karata-Russian dictionary browser".to_string());
        en.insert("help_browse".to_string(), "Browse the dictionary with live search (default)".to_string());
        en.insert("help_lookup".to_string(), "Print entries matching a query and exit".to_string());
        en.insert("help_lookup_query".to_string(), "Substring to look for in both columns".to_string());
        en.insert("help_db".to_string(), "Dictionary file (.db SQLite or .json)".to_string());
        en.insert("help_label_usage".to_string(), "Usage:".to_string());
        en.insert("help_label_commands".to_string(), "Commands:".to_string());
        en.insert("help_label_arguments".to_string(), "Arguments:".to_string());
        en.insert("help_label_options".to_string(), "Options:".to_string());
        // Config help
        en.insert("help_config_section".to_string(), "Config (~/.slovar/config.toml):".to_string());
        en.insert("help_config_dataset".to_string(), "dataset.path: dictionary file (env SLOVAR_DB overrides)".to_string());
        en.insert("help_config_tui_mode".to_string(), "display.tui_mode: interactive | simple (interactive by default)".to_string());
        en.insert("help_config_alt_screen".to_string(), "display.alt_screen: true | false (use alternate screen in interactive mode; default: false)".to_string());
        en.insert("help_config_aliases".to_string(), "search.aliases: glyphs treated as equal when searching".to_string());

        // View
        en.insert("column_term".to_string(), "Karata".to_string());
        en.insert("column_translation".to_string(), "Russian".to_string());
        en.insert("search_prompt".to_string(), "Search".to_string());
        en.insert("status_total".to_string(), "Words: {0}".to_string());
        en.insert("status_matches".to_string(), "Found: {0}".to_string());
        en.insert("status_matches_limited".to_string(), "Found: {0} (showing first {1})".to_string());
        en.insert("no_data_source".to_string(), "Database not found. Add the file {0}".to_string());
        en.insert("dataset_empty".to_string(), "The dictionary is empty".to_string());
        en.insert("no_results".to_string(), "Nothing found".to_string());
        en.insert("query_failed".to_string(), "Query failed: {0}".to_string());
        en.insert("end_of_list".to_string(), "End of list".to_string());
        en.insert("navigate_hint".to_string(), "Type to search, ↑/↓ PgUp/PgDn Home/End=scroll, Delete=clear, Esc=quit".to_string());
        en.insert("simple_hint".to_string(), "Enter=more, /text=search, /=clear search, q=quit".to_string());
        en.insert("simple_prompt".to_string(), "> ".to_string());
        en.insert("warning_interactive_failed".to_string(), "Warning: Cannot enable interactive mode, falling back to simple mode".to_string());

        // Error messages
        en.insert("error_load_dataset".to_string(), "Failed to load dictionary".to_string());
        en.insert("error_init_logging".to_string(), "Failed to open log file".to_string());
        en.insert("error_runtime".to_string(), "Failed to start the loader runtime".to_string());
        en.insert("error_terminal".to_string(), "Terminal error".to_string());
        en.insert("error_blank_query".to_string(), "Search query is empty".to_string());

        // Russian
        let mut ru = HashMap::new();
        // Help texts
        ru.insert("help_about".to_string(), "Каратинско-русский словарь".to_string());
        ru.insert("help_browse".to_string(), "Просмотр словаря с живым поиском (по умолчанию)".to_string());
        ru.insert("help_lookup".to_string(), "Вывести записи по запросу и выйти".to_string());
        ru.insert("help_lookup_query".to_string(), "Подстрока для поиска в обоих столбцах".to_string());
        ru.insert("help_db".to_string(), "Файл словаря (.db SQLite или .json)".to_string());
        ru.insert("help_label_usage".to_string(), "Использование:".to_string());
        ru.insert("help_label_commands".to_string(), "Команды:".to_string());
        ru.insert("help_label_arguments".to_string(), "Аргументы:".to_string());
        ru.insert("help_label_options".to_string(), "Параметры:".to_string());
        // Config help
        ru.insert("help_config_section".to_string(), "Конфигурация (~/.slovar/config.toml):".to_string());
        ru.insert("help_config_dataset".to_string(), "dataset.path: файл словаря (переменная SLOVAR_DB имеет приоритет)".to_string());
        ru.insert("help_config_tui_mode".to_string(), "display.tui_mode: interactive | simple (по умолчанию interactive)".to_string());
        ru.insert("help_config_alt_screen".to_string(), "display.alt_screen: true | false (альтернативный экран в интерактивном режиме, по умолчанию false)".to_string());
        ru.insert("help_config_aliases".to_string(), "search.aliases: символы, считающиеся одинаковыми при поиске".to_string());

        // View
        ru.insert("column_term".to_string(), "Каратинский".to_string());
        ru.insert("column_translation".to_string(), "Русский".to_string());
        ru.insert("search_prompt".to_string(), "Поиск".to_string());
        ru.insert("status_total".to_string(), "Слов: {0}".to_string());
        ru.insert("status_matches".to_string(), "Найдено: {0}".to_string());
        ru.insert("status_matches_limited".to_string(), "Найдено: {0} (показаны первые {1})".to_string());
        ru.insert("no_data_source".to_string(), "База данных не найдена. Добавьте файл {0}".to_string());
        ru.insert("dataset_empty".to_string(), "Словарь пуст".to_string());
        ru.insert("no_results".to_string(), "Ничего не найдено".to_string());
        ru.insert("query_failed".to_string(), "Ошибка запроса: {0}".to_string());
        ru.insert("end_of_list".to_string(), "Конец списка".to_string());
        ru.insert("navigate_hint".to_string(), "Ввод=поиск, ↑/↓ PgUp/PgDn Home/End=прокрутка, Delete=очистить, Esc=выход".to_string());
        ru.insert("simple_hint".to_string(), "Enter=ещё, /текст=поиск, /=сбросить поиск, q=выход".to_string());
        ru.insert("simple_prompt".to_string(), "> ".to_string());
        ru.insert("warning_interactive_failed".to_string(), "Внимание: интерактивный режим недоступен, используется простой режим".to_string());

        // Error messages
        ru.insert("error_load_dataset".to_string(), "Не удалось загрузить словарь".to_string());
        ru.insert("error_init_logging".to_string(), "Не удалось открыть файл журнала".to_string());
        ru.insert("error_runtime".to_string(), "Не удалось запустить загрузчик".to_string());
        ru.insert("error_terminal".to_string(), "Ошибка терминала".to_string());
        ru.insert("error_blank_query".to_string(), "Пустой поисковый запрос".to_string());

        translations.insert("en".to_string(), en);
        translations.insert("ru".to_string(), ru);

        // Accept both locale strings (ru_RU) and bare names
        let effective_lang = if lang.starts_with("ru") || lang == "russian" {
            "ru"
        } else {
            "en"
        };

        Self {
            translations,
            current_lang: effective_lang.to_string(),
        }
    }

    pub fn t(&self, key: &str) -> String {
        if let Some(lang_map) = self.translations.get(&self.current_lang) {
            if let Some(value) = lang_map.get(key) {
                return value.clone();
            }
        }
        key.to_string()
    }

    pub fn t_format(&self, key: &str, args: &[&str]) -> String {
        let template = self.t(key);
        let mut result = template;
        for (i, arg) in args.iter().enumerate() {
            result = result.replace(&format!("{{{}}}", i), arg);
        }
        result
    }
}
