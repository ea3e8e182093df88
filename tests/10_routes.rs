mod common;

use anyhow::Result;
use reqwest::{header, Method, StatusCode};
use serde_json::{json, Value};

/// (method, path, delegate) for every delegated route.
const ROUTES: &[(&str, &str, &str)] = &[
    ("POST", "/api/auth/login", "handleLogin"),
    ("GET", "/api/auth/status", "getAuthStatus"),
    ("GET", "/api/admin-log", "getAdminLog"),
    ("GET", "/api/permissions", "getPermissions"),
    ("PUT", "/api/permission/homework", "updatePermission"),
    ("POST", "/api/school", "createSchool"),
    ("GET", "/api/schools", "getSchools"),
    ("POST", "/api/student", "createStudent"),
    ("GET", "/api/students", "getStudents"),
    ("PUT", "/api/student/12/subjects", "updateStudentSubjects"),
    ("POST", "/api/subject", "createSubject"),
    ("GET", "/api/subjects", "getSubjects"),
    ("PUT", "/api/teacher/4/level", "updateTeacherLevel"),
    ("GET", "/api/teachers", "getTeachers"),
    ("GET", "/api/homeworks", "getHomeworks"),
    ("GET", "/api/student-attendance", "getStudentAttendance"),
    ("GET", "/api/student-attendances", "getStudentAttendances"),
];

#[tokio::test]
async fn each_route_invokes_its_delegate_once() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    for (method, path, delegate) in ROUTES {
        server.backend.clear();
        let method = Method::from_bytes(method.as_bytes())?;

        let mut request = client.request(method.clone(), server.url(path));
        if method != Method::GET {
            request = request.json(&json!({ "name": "x" }));
        }
        let res = request.send().await?;

        assert_ne!(res.status(), StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, path);
        assert_eq!(server.backend.names(), vec![*delegate], "{} {}", method, path);
    }
    Ok(())
}

/// (path, method the route refuses, advertised `Allow`) for every route.
const REJECTIONS: &[(&str, &str, &str)] = &[
    ("/api/auth/login", "GET", "POST"),
    ("/api/auth/logout", "GET", "POST"),
    ("/api/auth/status", "POST", "GET"),
    ("/api/admin-log", "DELETE", "GET"),
    ("/api/permissions", "POST", "GET"),
    ("/api/permission/homework", "GET", "PUT"),
    ("/api/school", "GET", "POST"),
    ("/api/schools", "POST", "GET"),
    ("/api/student", "GET", "POST"),
    ("/api/students", "PUT", "GET"),
    ("/api/student/12/subjects", "POST", "GET"),
    ("/api/subject", "DELETE", "POST"),
    ("/api/subjects", "POST", "GET"),
    ("/api/teacher/4/level", "PATCH", "PUT"),
    ("/api/teachers", "DELETE", "GET"),
    ("/api/homeworks", "PUT", "GET"),
    ("/api/student-attendance", "POST", "GET"),
    ("/api/student-attendances", "POST", "GET"),
];

#[tokio::test]
async fn undocumented_methods_get_405_without_delegating() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    for (path, method, allow) in REJECTIONS {
        let method = Method::from_bytes(method.as_bytes())?;
        let res = client.request(method.clone(), server.url(path)).send().await?;

        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, path);
        assert_eq!(res.headers()[header::ALLOW], *allow, "{} {}", method, path);
        assert!(res.headers().get(header::SET_COOKIE).is_none(), "{} {}", method, path);
        assert_eq!(res.text().await?, format!("Method {} Not Allowed", method));
    }

    assert!(server.backend.calls().is_empty());
    Ok(())
}

#[test]
fn rejection_table_covers_every_route() {
    let mut rejected: Vec<&str> = REJECTIONS.iter().map(|(path, _, _)| *path).collect();
    let mut routed: Vec<&str> = ROUTES.iter().map(|(_, path, _)| *path).collect();
    routed.push("/api/auth/logout");
    rejected.sort_unstable();
    routed.sort_unstable();
    assert_eq!(rejected, routed);
}

#[tokio::test]
async fn path_parameters_reach_the_delegate_verbatim() -> Result<()> {
    use academy_admin::backend::Delegate;

    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .put(server.url("/api/permission/%20school%20"))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .put(server.url("/api/teacher/%20/level"))
        .json(&json!({ "level": 2 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let delegates: Vec<Delegate> = server.backend.calls().into_iter().map(|c| c.delegate).collect();
    assert_eq!(
        delegates,
        vec![
            Delegate::UpdatePermission { name: " school ".to_string() },
            Delegate::UpdateTeacherLevel { pk: " ".to_string() },
        ]
    );
    Ok(())
}

#[tokio::test]
async fn student_subjects_advertises_get_but_accepts_put() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let res = client.post(server.url("/api/student/12/subjects")).send().await?;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers()[header::ALLOW], "GET");
    assert_eq!(res.text().await?, "Method POST Not Allowed");

    let res = client
        .put(server.url("/api/student/12/subjects"))
        .json(&json!({ "subjects": [3, 5] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let calls = server.backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].delegate,
        academy_admin::backend::Delegate::UpdateStudentSubjects { pk: "12".to_string() }
    );
    assert_eq!(calls[0].body, json!({ "subjects": [3, 5] }));
    Ok(())
}

#[tokio::test]
async fn query_string_and_cookie_reach_the_backend() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(server.url("/api/admin-log?page=2&teacher=kim"))
        .header(header::COOKIE, format!("theme=dark; token={}", common::TOKEN))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let calls = server.backend.calls();
    assert_eq!(calls[0].query.as_deref(), Some("page=2&teacher=kim"));
    assert_eq!(calls[0].token.as_deref(), Some(common::TOKEN));
    Ok(())
}

#[tokio::test]
async fn backend_errors_pass_through_untouched() -> Result<()> {
    let server = common::spawn_server().await?;
    server.backend.script(
        "createSchool",
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({ "name": ["이미 존재하는 학교입니다."] }),
    );

    let res = reqwest::Client::new()
        .post(server.url("/api/school"))
        .json(&json!({ "name": "한빛초등학교" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "name": ["이미 존재하는 학교입니다."] }));
    assert_eq!(server.backend.names(), vec!["createSchool"]);
    Ok(())
}

#[tokio::test]
async fn routes_live_under_the_base_path() -> Result<()> {
    let mut config = academy_admin::config::AppConfig::development();
    config.server.base_path = "/academy".to_string();
    let server = common::spawn_server_with(config).await?;

    // base_url already carries /academy
    let res = reqwest::get(server.url("/api/schools")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(server.backend.names(), vec!["getSchools"]);

    let origin = server.base_url.trim_end_matches("/academy");
    let res = reqwest::get(format!("{}/api/schools", origin)).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn root_describes_the_service() -> Result<()> {
    let server = common::spawn_server().await?;
    let body: Value = reqwest::get(server.url("/")).await?.json().await?;

    assert_eq!(body["success"], true);
    assert!(body["data"]["name"].is_string());
    Ok(())
}
