//! Testing utilities for the loglens workspace
//!
//! Realistic log fixtures and temp-file helpers shared by unit and
//! integration tests.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Maven compile with exactly one `cannot find symbol` block
pub const MAVEN_SYMBOL_FAILURE: &str = "\
[INFO] Scanning for projects...
[INFO]
[INFO] ------------------< com.shop:order-service >-------------------
[INFO] Building order-service 1.0.0-SNAPSHOT
[INFO] --- maven-compiler-plugin:3.11.0:compile (default-compile) @ order-service ---
[INFO] Compiling 42 source files to /work/shop/target/classes
[ERROR] /work/shop/src/main/java/com/shop/domain/OrderService.java:[27,9] cannot find symbol
  symbol:   class Money
  location: class OrderService
[INFO] 1 error
[INFO] ------------------------------------------------------------------------
[INFO] BUILD FAILURE
[INFO] ------------------------------------------------------------------------
[INFO] Total time:  3.214 s
";

/// Line of [`MAVEN_SYMBOL_FAILURE`] carrying the symbol error
pub const MAVEN_SYMBOL_LINE: usize = 7;

/// Two adjacent compile errors of different kinds; the first is the root
pub const MAVEN_CASCADE: &str = "\
[INFO] --- maven-compiler-plugin:3.11.0:compile (default-compile) @ order-service ---
[ERROR] /w/src/a/Foo.java:[3,8] package org.apache.commons.lang3 does not exist
[ERROR] /w/src/a/Bar.java:[10,5] cannot find symbol
[ERROR]   symbol:   class StringUtils
[ERROR]   location: class Bar
[INFO] 2 errors
";

/// Surefire run with a `NullPointerException` in one test
pub const SUREFIRE_NPE: &str = "\
[INFO] -------------------------------------------------------
[INFO]  T E S T S
[INFO] -------------------------------------------------------
[INFO] Running com.shop.OrderServiceTest
[ERROR] Tests run: 3, Failures: 0, Errors: 1, Skipped: 0, Time elapsed: 0.412 s <<< FAILURE! - in com.shop.OrderServiceTest
[ERROR] checkoutTotals  Time elapsed: 0.021 s  <<< ERROR!
java.lang.NullPointerException: Cannot invoke \"com.shop.Money.add(com.shop.Money)\" because \"this.total\" is null
\tat com.shop.domain.Order.addLine(Order.java:58)
\tat com.shop.OrderServiceTest.checkoutTotals(OrderServiceTest.java:31)
[INFO]
[INFO] Results:
[INFO]
[ERROR] Errors:
[ERROR]   OrderServiceTest.checkoutTotals:31 NullPointer Cannot invoke \"com.shop.Money.add(com.shop.Money)\"
[INFO]
[ERROR] Tests run: 3, Failures: 0, Errors: 1, Skipped: 0
";

/// Spring context start-up failing on a missing bean
pub const SPRING_MISSING_BEAN: &str = "\
2024-05-02 10:15:01.223  INFO 4711 --- [main] com.shop.ShopApplication : Starting ShopApplication
2024-05-02 10:15:03.870  WARN 4711 --- [main] s.c.a.AnnotationConfigApplicationContext : Exception encountered during context initialization
org.springframework.beans.factory.UnsatisfiedDependencyException: Error creating bean with name 'orderController'
Caused by: org.springframework.beans.factory.NoSuchBeanDefinitionException: No qualifying bean of type 'com.shop.infrastructure.persistence.OrderMapper' available
\tat org.springframework.beans.factory.support.DefaultListableBeanFactory.raiseNoMatchingBeanFound(DefaultListableBeanFactory.java:1801)
";

/// `count` numbered lines with no failure markers
#[must_use]
pub fn clean_log(count: usize) -> String {
    (1..=count)
        .map(|i| format!("[INFO] progress step {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `count` consecutive `[ERROR]` lines
#[must_use]
pub fn error_burst(count: usize) -> String {
    (1..=count)
        .map(|i| format!("[ERROR] failure number {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Chinese build log encoded as GBK
#[must_use]
pub fn gbk_log_bytes() -> Vec<u8> {
    let text = "[INFO] 开始构建订单服务，正在扫描项目中的所有模块\n\
                [INFO] 正在编译源代码文件，请耐心等待编译完成\n\
                [ERROR] /work/shop/src/main/java/com/shop/domain/OrderService.java:[12,5] 找不到符号\n\
                符号:   类 金额\n\
                位置:   类 订单服务\n\
                [INFO] 构建失败，请检查上面的错误信息并修改代码后重新构建\n";
    let (bytes, _, unmappable) = encoding_rs::GBK.encode(text);
    assert!(!unmappable, "fixture must be representable in GBK");
    bytes.into_owned()
}

/// Write `contents` to `dir/name`, creating `dir` if needed
pub fn write_log(dir: &Path, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Fresh temp directory holding `build.log`
pub fn temp_log(contents: impl AsRef<[u8]>) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_log(dir.path(), "build.log", contents);
    (dir, path)
}
