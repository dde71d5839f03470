//! Built-in libc stub headers

use super::HeaderStubs;

const FAKE_DEFINES: &str = r#"#ifndef _HEADERCHECK_FAKE_DEFINES_H
#define _HEADERCHECK_FAKE_DEFINES_H

#define NULL 0
#define EOF (-1)
#define BUFSIZ 8192
#define FILENAME_MAX 4096
#define SEEK_SET 0
#define SEEK_CUR 1
#define SEEK_END 2

#define EXIT_SUCCESS 0
#define EXIT_FAILURE 1
#define RAND_MAX 2147483647

#define CHAR_BIT 8
#define SCHAR_MIN (-128)
#define SCHAR_MAX 127
#define UCHAR_MAX 255
#define CHAR_MIN SCHAR_MIN
#define CHAR_MAX SCHAR_MAX
#define SHRT_MIN (-32768)
#define SHRT_MAX 32767
#define USHRT_MAX 65535
#define INT_MIN (-INT_MAX - 1)
#define INT_MAX 2147483647
#define UINT_MAX 4294967295U
#define LONG_MIN (-LONG_MAX - 1L)
#define LONG_MAX 9223372036854775807L
#define ULONG_MAX 18446744073709551615UL
#define LLONG_MIN (-LLONG_MAX - 1LL)
#define LLONG_MAX 9223372036854775807LL
#define ULLONG_MAX 18446744073709551615ULL
#define PATH_MAX 4096

#define INT8_MIN (-128)
#define INT8_MAX 127
#define UINT8_MAX 255
#define INT16_MIN (-32768)
#define INT16_MAX 32767
#define UINT16_MAX 65535
#define INT32_MIN (-INT32_MAX - 1)
#define INT32_MAX 2147483647
#define UINT32_MAX 4294967295U
#define INT64_MIN (-INT64_MAX - 1LL)
#define INT64_MAX 9223372036854775807LL
#define UINT64_MAX 18446744073709551615ULL
#define SIZE_MAX UINT64_MAX

#define EDOM 33
#define ERANGE 34
#define EINVAL 22
#define ENOMEM 12
#define EAGAIN 11

#define true 1
#define false 0
#define bool _Bool
#define __bool_true_false_are_defined 1

#define assert(expr) ((void)0)
#define offsetof(type, member) ((size_t)&((type *)0)->member)
#define va_start(ap, last) ((void)0)
#define va_end(ap) ((void)0)
#define va_arg(ap, type) (*(type *)0)
#define va_copy(dst, src) ((void)0)

#define HUGE_VAL (1e300 * 1e300)
#define INFINITY HUGE_VAL
#define NAN (0.0 / 0.0)

#define CLOCKS_PER_SEC 1000000L
#define SIG_DFL ((void (*)(int))0)
#define SIG_IGN ((void (*)(int))1)
#define SIGINT 2
#define SIGTERM 15

#define LC_ALL 6

#endif
"#;

const FAKE_TYPEDEFS: &str = r#"#ifndef _HEADERCHECK_FAKE_TYPEDEFS_H
#define _HEADERCHECK_FAKE_TYPEDEFS_H

typedef int size_t;
typedef int ssize_t;
typedef int ptrdiff_t;
typedef int wchar_t;
typedef int wint_t;
typedef int max_align_t;

typedef int int8_t;
typedef int uint8_t;
typedef int int16_t;
typedef int uint16_t;
typedef int int32_t;
typedef int uint32_t;
typedef int int64_t;
typedef int uint64_t;
typedef int int_least8_t;
typedef int uint_least8_t;
typedef int int_least16_t;
typedef int uint_least16_t;
typedef int int_least32_t;
typedef int uint_least32_t;
typedef int int_least64_t;
typedef int uint_least64_t;
typedef int int_fast8_t;
typedef int uint_fast8_t;
typedef int int_fast16_t;
typedef int uint_fast16_t;
typedef int int_fast32_t;
typedef int uint_fast32_t;
typedef int int_fast64_t;
typedef int uint_fast64_t;
typedef int intptr_t;
typedef int uintptr_t;
typedef int intmax_t;
typedef int uintmax_t;

typedef int FILE;
typedef int fpos_t;
typedef int va_list;
typedef int __builtin_va_list;
typedef int jmp_buf;
typedef int sig_atomic_t;
typedef int time_t;
typedef int clock_t;
typedef int div_t;
typedef int ldiv_t;
typedef int lldiv_t;
typedef int mbstate_t;
typedef int locale_t;

typedef int off_t;
typedef int pid_t;
typedef int uid_t;
typedef int gid_t;
typedef int mode_t;
typedef int dev_t;
typedef int ino_t;

typedef struct tm { int tm_sec; int tm_min; int tm_hour; int tm_mday; int tm_mon; int tm_year; int tm_wday; int tm_yday; int tm_isdst; } __headercheck_tm;

#endif
"#;

/// Headers that need nothing beyond the shared defines and typedefs
const PLAIN_HEADERS: &[&str] = &[
    "assert.h",
    "complex.h",
    "ctype.h",
    "fenv.h",
    "float.h",
    "inttypes.h",
    "iso646.h",
    "limits.h",
    "locale.h",
    "math.h",
    "setjmp.h",
    "signal.h",
    "stdalign.h",
    "stdarg.h",
    "stdatomic.h",
    "stdbool.h",
    "stddef.h",
    "stdint.h",
    "stdio.h",
    "stdlib.h",
    "stdnoreturn.h",
    "string.h",
    "tgmath.h",
    "threads.h",
    "time.h",
    "uchar.h",
    "wchar.h",
    "wctype.h",
    "unistd.h",
    "fcntl.h",
    "strings.h",
    "sys/types.h",
    "sys/stat.h",
    "sys/time.h",
];

const ERRNO_H: &str = r#"#include "_fake_defines.h"
#include "_fake_typedefs.h"

extern int errno;
"#;

pub(super) fn register(stubs: &mut HeaderStubs) {
    stubs.add("_fake_defines.h", FAKE_DEFINES);
    stubs.add("_fake_typedefs.h", FAKE_TYPEDEFS);
    stubs.add("errno.h", ERRNO_H);

    for header in PLAIN_HEADERS {
        // Nested headers still include the shared files from the stub root
        let prefix = "../".repeat(header.matches('/').count());
        let content = format!(
            "#include \"{prefix}_fake_defines.h\"\n#include \"{prefix}_fake_typedefs.h\"\n"
        );
        stubs.add(header, &content);
    }
}
