use parking_lot::Mutex;
use semkern::{
    AiService, AssistantContent, AuthorRole, AutoFunctionChoiceBehavior, ChatCompletionRequest,
    ChatCompletionService, ChatHistory, ChatMessage, CompletionError, FunctionCallingLoop,
    FunctionCallsProcessor, FunctionChoice, FunctionError, FunctionInvocationContext,
    FunctionInvocationFilter, FunctionValue, Kernel, KernelArguments, KernelConfig, KernelError,
    KernelPlugin, Map, Next, NoneFunctionChoiceBehavior, PromptExecutionSettings,
    functions::helpers, json,
};
use std::sync::Arc;

type Script = Box<dyn Fn(&ChatCompletionRequest<'_>) -> ChatMessage + Send + Sync>;

#[derive(Debug, Clone)]
struct Recorded {
    request_index: usize,
    history_len: usize,
    functions: Vec<String>,
    function_choice: Option<FunctionChoice>,
}

struct ScriptedService {
    id: &'static str,
    attributes: Map,
    script: Script,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl ScriptedService {
    fn new(
        id: &'static str,
        script: impl Fn(&ChatCompletionRequest<'_>) -> ChatMessage + Send + Sync + 'static,
    ) -> (Self, Arc<Mutex<Vec<Recorded>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let service = Self {
            id,
            attributes: Map::new(),
            script: Box::new(script),
            requests: requests.clone(),
        };
        (service, requests)
    }
}

impl AiService for ScriptedService {
    fn service_id(&self) -> &str {
        self.id
    }

    fn model_id(&self) -> Option<&str> {
        Some("scripted")
    }

    fn attributes(&self) -> &Map {
        &self.attributes
    }
}

#[async_trait::async_trait]
impl ChatCompletionService for ScriptedService {
    async fn complete(
        &self,
        request: ChatCompletionRequest<'_>,
    ) -> Result<ChatMessage, CompletionError> {
        self.requests.lock().push(Recorded {
            request_index: request.request_index,
            history_len: request.chat_history.len(),
            functions: request
                .functions
                .iter()
                .map(|f| f.fully_qualified_name('.'))
                .collect(),
            function_choice: request.function_choice,
        });
        Ok((self.script)(&request).with_model_id("scripted"))
    }
}

fn weather_plugin() -> KernelPlugin {
    let temperature = helpers::json_function(
        "temperature",
        "Gets the temperature at a location",
        json!({
            "type": "object",
            "properties": { "loc": { "type": "string" } },
            "required": ["loc"]
        }),
        |args| match args.get("loc").and_then(|loc| loc.as_str()) {
            Some("Dublin") => Ok(json!(10)),
            Some(loc) => Err(FunctionError::failed(format!("unknown location {loc}"))),
            None => Err(FunctionError::InvalidArguments("`loc` is required".to_owned())),
        },
    );
    KernelPlugin::new("weather", "Weather information").with_function(temperature)
}

fn temperature_call(id: &str, loc: &str) -> AssistantContent {
    let mut args = Map::new();
    args.insert("loc".to_owned(), loc.into());
    AssistantContent::function_call(id, Some("weather"), "temperature", args)
}

fn auto_settings() -> PromptExecutionSettings {
    PromptExecutionSettings::new().with_function_choice_behavior(AutoFunctionChoiceBehavior::new())
}

#[tokio::test]
async fn answers_with_function_result() {
    let (service, requests) = ScriptedService::new("scripted", |request| {
        let tool_result = request
            .chat_history
            .last()
            .and_then(|message| message.function_results().first())
            .map(|result| result.result_text());
        match tool_result {
            Some(temperature) => ChatMessage::assistant(format!("It's {temperature} degrees.")),
            None => ChatMessage::assistant_with_items(vec![temperature_call("call_1", "Dublin")]),
        }
    });
    let kernel = Kernel::builder()
        .plugin(weather_plugin())
        .service(service)
        .build()
        .unwrap();

    let mut history = ChatHistory::new();
    history.add_user_message("What's the temperature in Dublin?");
    let response = kernel
        .get_chat_message_content(&mut history, Some(&auto_settings()))
        .await
        .unwrap();

    assert_eq!(response.content(), Some("It's 10 degrees."));
    let roles = history.iter().map(|message| message.role()).collect::<Vec<_>>();
    assert_eq!(
        roles,
        [AuthorRole::User, AuthorRole::Assistant, AuthorRole::Tool, AuthorRole::Assistant]
    );
    assert!(history[1].has_function_calls());
    let result = &history[2].function_results()[0];
    assert_eq!(result.call_id, "call_1");
    assert_eq!(result.plugin_name.as_deref(), Some("weather"));
    assert_eq!(result.result_text(), "10");
    assert_eq!(history.last(), Some(&response));

    let requests = requests.lock();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].request_index, 1);
    assert_eq!(requests[0].history_len, 1);
    assert_eq!(requests[0].functions, ["weather.temperature"]);
    assert_eq!(requests[0].function_choice, Some(FunctionChoice::Auto));
    assert_eq!(requests[1].request_index, 2);
    assert_eq!(requests[1].history_len, 3);
}

#[tokio::test]
async fn stops_auto_invoking_at_the_ceiling() {
    let (service, requests) = ScriptedService::new("scripted", |request| {
        let id = format!("call_{}", request.request_index);
        ChatMessage::assistant_with_items(vec![temperature_call(&id, "Dublin")])
    });
    let kernel = Kernel::builder()
        .plugin(weather_plugin())
        .service(service)
        .build()
        .unwrap();

    let mut history = ChatHistory::new();
    history.add_user_message("Keep asking");
    let response = kernel
        .get_chat_message_content(&mut history, Some(&auto_settings()))
        .await
        .unwrap();

    let requests = requests.lock();
    assert_eq!(requests.len(), 128);
    assert_eq!(requests.last().map(|r| r.request_index), Some(128));
    assert!(response.has_function_calls());
    assert_eq!(response.function_calls()[0].id, "call_128");

    // user + 127 rounds of (assistant + tool) + the final response
    assert_eq!(history.len(), 1 + 127 * 2 + 1);
    let tool_messages = history
        .iter()
        .filter(|message| message.role() == AuthorRole::Tool)
        .count();
    assert_eq!(tool_messages, 127);
}

#[tokio::test]
async fn isolates_failing_calls() {
    let (service, _) = ScriptedService::new("scripted", |request| {
        if request.request_index == 1 {
            ChatMessage::assistant_with_items(vec![
                temperature_call("a", "Dublin"),
                temperature_call("b", "Atlantis"),
                temperature_call("c", "Dublin"),
            ])
        } else {
            ChatMessage::assistant("done")
        }
    });
    let kernel = Kernel::builder()
        .plugin(weather_plugin())
        .service(service)
        .build()
        .unwrap();

    let mut history = ChatHistory::new();
    history.add_user_message("Compare");
    kernel
        .get_chat_message_content(&mut history, Some(&auto_settings()))
        .await
        .unwrap();

    let results = history
        .iter()
        .flat_map(|message| message.function_results())
        .map(|result| (result.call_id.as_str(), result.result_text()))
        .collect::<Vec<_>>();
    assert_eq!(
        results,
        [
            ("a", "10".to_owned()),
            ("b", "Error while invoking function: unknown location Atlantis".to_owned()),
            ("c", "10".to_owned()),
        ]
    );
}

#[tokio::test]
async fn reports_unadvertised_calls_as_undefined() {
    let (service, _) = ScriptedService::new("scripted", |request| {
        if request.request_index > 1 {
            return ChatMessage::assistant("done");
        }
        let mut unknown = Map::new();
        unknown.insert("loc".to_owned(), "Dublin".into());
        ChatMessage::assistant_with_items(vec![
            temperature_call("a", "Dublin"),
            AssistantContent::function_call("b", Some("weather"), "humidity", unknown),
        ])
    });
    let kernel = Kernel::builder()
        .plugin(weather_plugin())
        .service(service)
        .build()
        .unwrap();

    // Only `weather.temperature` is advertised and `weather.humidity` is not registered.
    let behavior = AutoFunctionChoiceBehavior::new()
        .with_functions(["weather.temperature"]);
    let settings = PromptExecutionSettings::new().with_function_choice_behavior(behavior);
    let mut history = ChatHistory::new();
    history.add_user_message("Weather?");
    kernel
        .get_chat_message_content(&mut history, Some(&settings))
        .await
        .unwrap();

    let results = history
        .iter()
        .flat_map(|message| message.function_results())
        .map(|result| result.result_text())
        .collect::<Vec<_>>();
    assert_eq!(
        results,
        [
            "10".to_owned(),
            "Function call request for a function humidity that was not defined.".to_owned(),
        ]
    );
}

#[tokio::test]
async fn distinguishes_unavailable_from_undefined() {
    let (service, _) = ScriptedService::new("scripted", |request| {
        if request.request_index > 1 {
            return ChatMessage::assistant("done");
        }
        ChatMessage::assistant_with_items(vec![AssistantContent::function_call(
            "a",
            Some("clock"),
            "now",
            Map::new(),
        )])
    });
    let kernel = Kernel::builder()
        .plugin(weather_plugin())
        .service(service)
        .build()
        .unwrap();

    #[derive(Debug)]
    struct AdvertiseNothing;

    impl semkern::FunctionChoiceBehavior for AdvertiseNothing {
        fn configure(
            &self,
            _context: semkern::FunctionChoiceContext<'_>,
        ) -> Result<semkern::FunctionChoiceConfiguration, KernelError> {
            Ok(semkern::FunctionChoiceConfiguration {
                choice: FunctionChoice::Auto,
                auto_invoke: true,
                functions: Vec::new(),
            })
        }
    }

    // Every call counts as advertised, but `clock.now` is not registered.
    let mut history = ChatHistory::new();
    let message = ChatMessage::assistant_with_items(vec![AssistantContent::function_call(
        "a",
        Some("clock"),
        "now",
        Map::new(),
    )]);
    semkern::FunctionCallsProcessor::new()
        .process_function_calls(message, &mut history, |_| true, Some(&kernel))
        .await
        .unwrap();
    assert_eq!(
        history[1].function_results()[0].result_text(),
        "The specified function now is not available in the kernel."
    );

    // Through the loop the same call is not advertised, so it is reported as undefined.
    let settings = PromptExecutionSettings::new().with_function_choice_behavior(AdvertiseNothing);
    let mut history = ChatHistory::new();
    history.add_user_message("Time?");
    kernel
        .get_chat_message_content(&mut history, Some(&settings))
        .await
        .unwrap();
    assert_eq!(
        history[2].function_results()[0].result_text(),
        "Function call request for a function now that was not defined."
    );
}

#[tokio::test]
async fn none_behavior_advertises_without_invoking() {
    let (service, requests) = ScriptedService::new("scripted", |_| {
        ChatMessage::assistant_with_items(vec![temperature_call("a", "Dublin")])
    });
    let kernel = Kernel::builder()
        .plugin(weather_plugin())
        .service(service)
        .build()
        .unwrap();

    let settings = PromptExecutionSettings::new()
        .with_function_choice_behavior(NoneFunctionChoiceBehavior::new());
    let mut history = ChatHistory::new();
    history.add_user_message("Weather?");
    let response = kernel
        .get_chat_message_content(&mut history, Some(&settings))
        .await
        .unwrap();

    assert!(response.has_function_calls());
    assert_eq!(history.len(), 2);
    let requests = requests.lock();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].function_choice, Some(FunctionChoice::None));
    assert_eq!(requests[0].functions, ["weather.temperature"]);
}

#[tokio::test]
async fn explicit_missing_function_is_fatal() {
    let (service, requests) = ScriptedService::new("scripted", |_| ChatMessage::assistant("hi"));
    let kernel = Kernel::builder()
        .plugin(weather_plugin())
        .service(service)
        .build()
        .unwrap();

    let behavior = AutoFunctionChoiceBehavior::new().with_functions(["weather.humidity"]);
    let settings = PromptExecutionSettings::new().with_function_choice_behavior(behavior);
    let mut history = ChatHistory::new();
    history.add_user_message("Weather?");
    let err = kernel
        .get_chat_message_content(&mut history, Some(&settings))
        .await
        .unwrap_err();

    assert!(matches!(err, KernelError::FunctionNotAvailable(name) if name == "weather.humidity"));
    assert!(requests.lock().is_empty());
    assert_eq!(history.len(), 1);
}

struct UppercaseResults;

#[async_trait::async_trait]
impl FunctionInvocationFilter for UppercaseResults {
    async fn on_function_invocation(
        &self,
        context: &mut FunctionInvocationContext<'_>,
        next: Next<'_>,
    ) -> Result<(), FunctionError> {
        next.run(context).await?;
        if let Some(message) = context.result.value.as_message() {
            let text = message.content().unwrap_or_default().to_uppercase();
            context.result.value = FunctionValue::from(ChatMessage::assistant(text));
        }
        Ok(())
    }
}

#[tokio::test]
async fn invokes_prompt_through_filters() {
    let (service, requests) = ScriptedService::new("scripted", |request| {
        let prompt = request.chat_history[0].content().unwrap_or_default();
        ChatMessage::assistant(format!("echo: {prompt}"))
    });
    let config = KernelConfig::from_toml_str(r#"default_template_format = "jinja""#).unwrap();
    let kernel = Kernel::builder()
        .config(config)
        .service(service)
        .filter(UppercaseResults)
        .build()
        .unwrap();

    let args = KernelArguments::new().with_argument("city", "Dublin");
    let result = kernel
        .invoke_prompt("Weather in {{ city }}?", args)
        .await
        .unwrap();

    assert_eq!(result.rendered_prompt.as_deref(), Some("Weather in Dublin?"));
    assert_eq!(result.value.to_result_text(), "ECHO: WEATHER IN DUBLIN?");
    assert_eq!(requests.lock().len(), 1);
    assert_eq!(requests.lock()[0].function_choice, None);
}

#[tokio::test]
async fn selects_service_by_settings() {
    let (first, first_requests) =
        ScriptedService::new("first", |_| ChatMessage::assistant("first"));
    let (second, second_requests) =
        ScriptedService::new("second", |_| ChatMessage::assistant("second"));
    let kernel = Kernel::builder()
        .service(first)
        .service(second)
        .build()
        .unwrap();

    let mut history = ChatHistory::new();
    history.add_user_message("hi");
    let response = kernel.get_chat_message_content(&mut history, None).await.unwrap();
    assert_eq!(response.content(), Some("first"));

    let settings = PromptExecutionSettings::new().with_service_id("second");
    let response = kernel
        .get_chat_message_content(&mut history, Some(&settings))
        .await
        .unwrap();
    assert_eq!(response.content(), Some("second"));
    assert_eq!(response.model_id.as_deref(), Some("scripted"));
    assert_eq!(first_requests.lock().len(), 1);
    assert_eq!(second_requests.lock().len(), 1);
}

#[tokio::test]
async fn auto_invoke_without_kernel_is_fatal() {
    let (service, requests) = ScriptedService::new("scripted", |_| {
        ChatMessage::assistant_with_items(vec![temperature_call("call_1", "Dublin")])
    });
    let settings = auto_settings();
    let mut history = ChatHistory::new();
    history.add_user_message("What's the temperature in Dublin?");

    let err = FunctionCallingLoop::new(&service)
        .with_settings(Some(&settings))
        .run(&mut history)
        .await
        .unwrap_err();
    assert!(matches!(err, KernelError::KernelRequired));
    assert_eq!(history.len(), 1);
    assert!(requests.lock().is_empty());

    let settings = PromptExecutionSettings::new()
        .with_function_choice_behavior(NoneFunctionChoiceBehavior::new());
    let response = FunctionCallingLoop::new(&service)
        .with_settings(Some(&settings))
        .run(&mut history)
        .await
        .unwrap();
    assert!(response.has_function_calls());
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn explicit_processor_ceiling_wins_over_kernel() {
    let (service, requests) = ScriptedService::new("scripted", |request| {
        let id = format!("call_{}", request.request_index);
        ChatMessage::assistant_with_items(vec![temperature_call(&id, "Dublin")])
    });
    let kernel = Kernel::builder().plugin(weather_plugin()).build().unwrap();
    let settings = auto_settings();
    let mut history = ChatHistory::new();
    history.add_user_message("Keep asking");

    let processor = FunctionCallsProcessor::new().with_max_auto_invoke_attempts(5);
    let response = FunctionCallingLoop::new(&service)
        .with_processor(processor)
        .with_kernel(&kernel)
        .with_settings(Some(&settings))
        .run(&mut history)
        .await
        .unwrap();
    assert_eq!(requests.lock().len(), 5);
    assert_eq!(response.function_calls()[0].id, "call_5");

    let config = KernelConfig {
        max_auto_invoke_attempts: 3,
        ..KernelConfig::default()
    };
    let kernel = Kernel::builder()
        .config(config)
        .plugin(weather_plugin())
        .build()
        .unwrap();
    requests.lock().clear();
    FunctionCallingLoop::new(&service)
        .with_kernel(&kernel)
        .with_settings(Some(&settings))
        .run(&mut history)
        .await
        .unwrap();
    assert_eq!(requests.lock().len(), 3);
}
